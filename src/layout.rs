//! Declarative page description: which controls exist, their ids, bounds and
//! defaults. The panels in `ui` render whatever this describes.

use crate::callbacks::{InputId, OutputId};
use crate::data::filter::{
    format_mass, ControlState, FilterError, PayloadRange, SiteSelection, ALL_SITES,
};
use crate::data::model::Dataset;

pub const PAYLOAD_MIN: f64 = 0.0;
pub const PAYLOAD_MAX: f64 = 10000.0;
pub const PAYLOAD_STEP: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSliderSpec {
    pub id: InputId,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Tick position → label, e.g. `(2000.0, "2000 kg")`.
    pub marks: Vec<(f64, String)>,
    pub default: (f64, f64),
}

impl RangeSliderSpec {
    /// Snap to the nearest step inside `[min, max]`.
    pub fn snap(&self, v: f64) -> f64 {
        let stepped = ((v - self.min) / self.step).round() * self.step + self.min;
        stepped.clamp(self.min, self.max)
    }

    /// Move one handle; the other is pushed along so `lo <= hi` holds.
    pub fn move_handle(&self, current: (f64, f64), handle: Handle, to: f64) -> (f64, f64) {
        let to = self.snap(to);
        match handle {
            Handle::Lower => (to, current.1.max(to)),
            Handle::Upper => (current.0.min(to), to),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Lower,
    Upper,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownSpec {
    pub id: InputId,
    pub options: Vec<DropdownOption>,
    pub default: String,
    pub placeholder: &'static str,
    pub searchable: bool,
}

impl DropdownSpec {
    /// Options whose label contains `query`, case-insensitively.
    pub fn matching<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a DropdownOption> + 'a {
        let query = query.trim().to_lowercase();
        self.options
            .iter()
            .filter(move |o| query.is_empty() || o.label.to_lowercase().contains(&query))
    }

    pub fn label_for(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub payload_slider: RangeSliderSpec,
    pub site_dropdown: DropdownSpec,
    pub graphs: [OutputId; 2],
}

impl Layout {
    /// Page layout; dropdown choices come from the dataset's sites.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let marks = (0..=((PAYLOAD_MAX - PAYLOAD_MIN) / PAYLOAD_STEP) as usize)
            .map(|i| {
                let v = PAYLOAD_MIN + i as f64 * PAYLOAD_STEP;
                (v, format!("{} kg", format_mass(v)))
            })
            .collect();

        let mut options = vec![DropdownOption {
            label: "All Sites".to_string(),
            value: ALL_SITES.to_string(),
        }];
        options.extend(dataset.sites().iter().map(|s| DropdownOption {
            label: s.clone(),
            value: s.clone(),
        }));

        Layout {
            payload_slider: RangeSliderSpec {
                id: InputId::PayloadSlider,
                label: "Payload range (Kg):",
                min: PAYLOAD_MIN,
                max: PAYLOAD_MAX,
                step: PAYLOAD_STEP,
                marks,
                default: (PAYLOAD_MIN, PAYLOAD_MAX),
            },
            site_dropdown: DropdownSpec {
                id: InputId::SiteDropdown,
                options,
                default: ALL_SITES.to_string(),
                placeholder: "Select a Launch Site here",
                searchable: true,
            },
            graphs: [OutputId::SuccessPieChart, OutputId::SuccessPayloadScatterChart],
        }
    }

    /// Control values before any user interaction.
    pub fn default_controls(&self) -> Result<ControlState, FilterError> {
        let (min, max) = self.payload_slider.default;
        Ok(ControlState {
            payload_range: PayloadRange::new(min, max)?,
            site: SiteSelection::from_token(&self.site_dropdown.default),
        })
    }
}
