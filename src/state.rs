use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::callbacks::{CallbackRegistry, InputId, OutputId};
use crate::chart::ChartSpec;
use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, ControlState, PayloadRange, SiteSelection};
use crate::data::model::Dataset;
use crate::layout::Layout;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Read-only table shared with every callback.
    pub dataset: Arc<Dataset>,

    /// Where the dataset came from, shown in the top bar.
    pub source: String,

    /// Page description derived from the dataset.
    pub layout: Layout,

    /// Current control values.
    pub controls: ControlState,

    /// Input → handler → output wiring.
    registry: CallbackRegistry,

    /// Latest figure per chart region.
    figures: BTreeMap<OutputId, ChartSpec>,

    /// Indices of records passing the current filters (record table).
    pub visible_indices: Vec<usize>,

    /// Booster category colours for the scatter chart.
    pub color_map: ColorMap,

    /// Text typed into the searchable site dropdown.
    pub site_query: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, source: impl Into<String>) -> Result<Self> {
        let layout = Layout::for_dataset(&dataset);
        let controls = layout
            .default_controls()
            .context("default payload range")?;
        let mut state = Self {
            color_map: ColorMap::new(dataset.booster_categories()),
            dataset,
            source: source.into(),
            layout,
            controls,
            registry: CallbackRegistry::standard().context("wiring chart callbacks")?,
            figures: BTreeMap::new(),
            visible_indices: Vec::new(),
            site_query: String::new(),
            status_message: None,
        };
        log::debug!(
            "callbacks wired for {:?}",
            state.registry.outputs().map(OutputId::as_str).collect::<Vec<_>>()
        );
        state.refresh_all();
        Ok(state)
    }

    pub fn figure(&self, id: OutputId) -> Option<&ChartSpec> {
        self.figures.get(&id)
    }

    /// Slider moved. No-op when the range is unchanged; an invalid range is
    /// rejected and reported in the status line, keeping the current one.
    pub fn set_payload_range(&mut self, lo: f64, hi: f64) {
        let range = match PayloadRange::new(lo, hi) {
            Ok(range) => range,
            Err(e) => {
                log::warn!("payload range rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };
        if range == self.controls.payload_range {
            return;
        }
        self.controls.payload_range = range;
        self.on_input_changed(InputId::PayloadSlider);
    }

    /// Dropdown selection changed.
    pub fn set_site(&mut self, site: SiteSelection) {
        if site == self.controls.site {
            return;
        }
        self.controls.site = site;
        self.on_input_changed(InputId::SiteDropdown);
    }

    /// Swap in a newly loaded dataset and re-render everything.
    pub fn set_dataset(&mut self, dataset: Dataset, source: impl Into<String>) {
        if let SiteSelection::Site(site) = &self.controls.site {
            if !dataset.has_site(site) {
                log::warn!("site '{site}' not present in new dataset, resetting to ALL");
                self.controls.site = SiteSelection::All;
            }
        }
        self.layout = Layout::for_dataset(&dataset);
        self.color_map = ColorMap::new(dataset.booster_categories());
        self.dataset = Arc::new(dataset);
        self.source = source.into();
        self.status_message = None;
        self.refresh_all();
    }

    /// Load a file and make it the active dataset. On failure the current
    /// dataset stays and the error is shown in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} contains no launch records", path.display());
                }
                log::info!(
                    "Loaded {} launch records from {} ({} sites)",
                    dataset.len(),
                    path.display(),
                    dataset.sites().len()
                );
                self.set_dataset(dataset, path.display().to_string());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current figures as a JSON object keyed by chart id.
    pub fn export_figures(&self, path: &Path) -> Result<()> {
        let by_id: BTreeMap<&str, &ChartSpec> = self
            .figures
            .iter()
            .map(|(id, spec)| (id.as_str(), spec))
            .collect();
        let json = serde_json::to_string_pretty(&by_id).context("serializing figures")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing figures to {}", path.display()))?;
        log::info!("Exported {} figures to {}", by_id.len(), path.display());
        Ok(())
    }

    fn on_input_changed(&mut self, input: InputId) {
        let updates = self.registry.dispatch(input, &self.controls, &self.dataset);
        self.figures.extend(updates);
        self.refilter();
    }

    fn refresh_all(&mut self) {
        let updates = self.registry.dispatch_all(&self.controls, &self.dataset);
        self.figures.extend(updates);
        self.refilter();
    }

    /// Recompute `visible_indices` after a control change.
    fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.controls);
        log::debug!(
            "{} of {} records selected",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn sample_state() -> AppState {
        AppState::new(Arc::new(Dataset::sample()), "built-in sample").unwrap()
    }

    fn pie_counts(state: &AppState) -> Vec<usize> {
        state
            .figure(OutputId::SuccessPieChart)
            .and_then(ChartSpec::pie_slices)
            .unwrap()
            .iter()
            .map(|s| s.count)
            .collect()
    }

    #[test]
    fn initial_render_covers_both_charts() {
        let state = sample_state();
        assert_eq!(pie_counts(&state), [3, 2]);
        let scatter = state.figure(OutputId::SuccessPayloadScatterChart).unwrap();
        assert_eq!(scatter.scatter_points().unwrap().len(), 5);
        assert_eq!(state.visible_indices, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn control_changes_refresh_figures() {
        let mut state = sample_state();
        state.set_payload_range(1000.0, 2000.0);
        state.set_site(SiteSelection::from_token("CCAFS LC-40"));
        assert_eq!(pie_counts(&state), [2]);
        let scatter = state.figure(OutputId::SuccessPayloadScatterChart).unwrap();
        assert_eq!(scatter.title, "Payload vs Success for CCAFS LC-40");
        assert_eq!(scatter.scatter_points().unwrap().len(), 2);
        assert_eq!(state.visible_indices, [0, 2]);
    }

    #[test]
    fn inverted_payload_range_is_rejected_and_reported() {
        let mut state = sample_state();
        state.set_payload_range(1000.0, 2000.0);
        state.set_payload_range(3000.0, 1000.0);
        assert_eq!(state.controls.payload_range.min(), 1000.0);
        assert_eq!(state.controls.payload_range.max(), 2000.0);
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("exceeds maximum"));
        assert_eq!(state.visible_indices, [0, 1, 2]);
    }

    #[test]
    fn dataset_swap_resets_vanished_site() {
        let mut state = sample_state();
        state.set_site(SiteSelection::from_token("KSC LC-39A"));
        let replacement = Dataset::from_records(vec![LaunchRecord::new(
            "CCSFS SLC-40",
            4000.0,
            Outcome::Failure,
            "FT",
        )
        .unwrap()]);
        state.set_dataset(replacement, "replacement.csv");
        assert_eq!(state.controls.site, SiteSelection::All);
        assert_eq!(pie_counts(&state), [1]);
        assert_eq!(state.layout.site_dropdown.options.len(), 2);
    }

    #[test]
    fn failed_load_keeps_current_dataset() {
        let mut state = sample_state();
        state.load_path(Path::new("/nonexistent/launches.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset.len(), 5);
    }

    #[test]
    fn header_only_file_loads_as_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "Launch Site,Payload Mass (kg),class,Booster Version Category\n")
            .unwrap();
        let mut state = sample_state();
        state.load_path(&path);
        assert!(state.dataset.is_empty());
        assert!(state.status_message.is_none());
        assert!(pie_counts(&state).is_empty());
    }

    #[test]
    fn export_writes_figures_keyed_by_chart_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures.json");
        sample_state().export_figures(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["success-pie-chart"]["type"], "pie");
        assert_eq!(json["success-payload-scatter-chart"]["points"].as_array().unwrap().len(), 5);
    }
}
