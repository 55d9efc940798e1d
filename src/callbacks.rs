use std::fmt;

use thiserror::Error;

use crate::chart::{update_pie_chart, update_scatter_plot, ChartSpec};
use crate::data::filter::ControlState;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Component identifiers
// ---------------------------------------------------------------------------

/// Controls whose value changes trigger callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputId {
    PayloadSlider,
    SiteDropdown,
}

impl InputId {
    pub fn as_str(self) -> &'static str {
        match self {
            InputId::PayloadSlider => "payload-slider",
            InputId::SiteDropdown => "site-dropdown",
        }
    }
}

/// Chart regions whose figure is replaced by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputId {
    SuccessPieChart,
    SuccessPayloadScatterChart,
}

impl OutputId {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputId::SuccessPieChart => "success-pie-chart",
            OutputId::SuccessPayloadScatterChart => "success-payload-scatter-chart",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Subscription table
// ---------------------------------------------------------------------------

pub type Handler = fn(&ControlState, &Dataset) -> ChartSpec;

pub struct Callback {
    pub inputs: Vec<InputId>,
    pub output: OutputId,
    pub handler: Handler,
}

#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("output '{0}' already has a callback")]
    DuplicateOutput(OutputId),
    #[error("callback for '{0}' has no inputs")]
    NoInputs(OutputId),
}

/// Input → handler → output wiring, built once at startup.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: Vec<Callback>,
}

impl CallbackRegistry {
    /// The dashboard's two callbacks, each listening to both controls.
    pub fn standard() -> Result<Self, CallbackError> {
        let mut registry = Self::default();
        registry.register(
            vec![InputId::PayloadSlider, InputId::SiteDropdown],
            OutputId::SuccessPieChart,
            update_pie_chart,
        )?;
        registry.register(
            vec![InputId::SiteDropdown, InputId::PayloadSlider],
            OutputId::SuccessPayloadScatterChart,
            update_scatter_plot,
        )?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        inputs: Vec<InputId>,
        output: OutputId,
        handler: Handler,
    ) -> Result<(), CallbackError> {
        if inputs.is_empty() {
            return Err(CallbackError::NoInputs(output));
        }
        if self.callbacks.iter().any(|cb| cb.output == output) {
            return Err(CallbackError::DuplicateOutput(output));
        }
        self.callbacks.push(Callback {
            inputs,
            output,
            handler,
        });
        Ok(())
    }

    pub fn outputs(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.callbacks.iter().map(|cb| cb.output)
    }

    /// Run every callback subscribed to `changed`, in registration order.
    pub fn dispatch(
        &self,
        changed: InputId,
        controls: &ControlState,
        dataset: &Dataset,
    ) -> Vec<(OutputId, ChartSpec)> {
        let refreshed: Vec<(OutputId, ChartSpec)> = self
            .callbacks
            .iter()
            .filter(|cb| cb.inputs.contains(&changed))
            .map(|cb| (cb.output, (cb.handler)(controls, dataset)))
            .collect();
        log::debug!(
            "{changed} changed: refreshed {:?}",
            refreshed.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>()
        );
        refreshed
    }

    /// Run every callback; used for the first render and after a dataset swap.
    pub fn dispatch_all(
        &self,
        controls: &ControlState,
        dataset: &Dataset,
    ) -> Vec<(OutputId, ChartSpec)> {
        self.callbacks
            .iter()
            .map(|cb| (cb.output, (cb.handler)(controls, dataset)))
            .collect()
    }
}
