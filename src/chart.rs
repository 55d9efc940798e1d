use serde::Serialize;

use crate::data::filter::{filter, ControlState, PayloadRange, SiteSelection};
use crate::data::model::{Dataset, LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Chart description handed to the rendering layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(flatten)]
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Pie {
        slices: Vec<PieSlice>,
    },
    Scatter {
        x_label: String,
        y_label: String,
        points: Vec<ScatterPoint>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// Outcome value as shown in the legend (`"1"` / `"0"`).
    pub label: String,
    pub outcome: Outcome,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub category: String,
}

pub const PAYLOAD_AXIS_LABEL: &str = "Payload Mass (kg)";
pub const OUTCOME_AXIS_LABEL: &str = "Launch Outcome";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Success/failure counts over `filtered`, largest group first.
/// Equal counts keep first-seen order. No records, no slices.
pub fn build_pie(filtered: &[&LaunchRecord], range: &PayloadRange) -> ChartSpec {
    let mut slices: Vec<PieSlice> = Vec::new();
    for rec in filtered {
        match slices.iter_mut().find(|s| s.outcome == rec.outcome) {
            Some(slice) => slice.count += 1,
            None => slices.push(PieSlice {
                label: rec.outcome.to_string(),
                outcome: rec.outcome,
                count: 1,
            }),
        }
    }
    // Stable, so ties stay in first-seen order.
    slices.sort_by(|a, b| b.count.cmp(&a.count));

    ChartSpec {
        title: format!("Launch Success Distribution (Payload: {range} kg)"),
        kind: ChartKind::Pie { slices },
    }
}

/// One point per record: payload on x, outcome class on y, coloured by
/// booster category.
pub fn build_scatter(filtered: &[&LaunchRecord], site: &SiteSelection) -> ChartSpec {
    let title = match site {
        SiteSelection::Site(name) => format!("Payload vs Success for {name}"),
        SiteSelection::All => "Payload vs Success (All Sites)".to_string(),
    };
    let points = filtered
        .iter()
        .map(|rec| ScatterPoint {
            x: rec.payload_mass,
            y: rec.outcome.as_f64(),
            category: rec.booster_category.clone(),
        })
        .collect();

    ChartSpec {
        title,
        kind: ChartKind::Scatter {
            x_label: PAYLOAD_AXIS_LABEL.to_string(),
            y_label: OUTCOME_AXIS_LABEL.to_string(),
            points,
        },
    }
}

// ---------------------------------------------------------------------------
// Callback handlers: filter, then build
// ---------------------------------------------------------------------------

pub fn update_pie_chart(controls: &ControlState, dataset: &Dataset) -> ChartSpec {
    let filtered = filter(dataset, &controls.payload_range, &controls.site);
    build_pie(&filtered, &controls.payload_range)
}

pub fn update_scatter_plot(controls: &ControlState, dataset: &Dataset) -> ChartSpec {
    let filtered = filter(dataset, &controls.payload_range, &controls.site);
    build_scatter(&filtered, &controls.site)
}

#[cfg(test)]
impl ChartSpec {
    pub fn pie_slices(&self) -> Option<&[PieSlice]> {
        match &self.kind {
            ChartKind::Pie { slices } => Some(slices),
            ChartKind::Scatter { .. } => None,
        }
    }

    pub fn scatter_points(&self) -> Option<&[ScatterPoint]> {
        match &self.kind {
            ChartKind::Scatter { points, .. } => Some(points),
            ChartKind::Pie { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(min: f64, max: f64, site: &str) -> ControlState {
        ControlState {
            payload_range: PayloadRange::new(min, max).unwrap(),
            site: SiteSelection::from_token(site),
        }
    }

    fn counts(spec: &ChartSpec) -> Vec<(String, usize)> {
        spec.pie_slices()
            .unwrap()
            .iter()
            .map(|s| (s.label.clone(), s.count))
            .collect()
    }

    #[test]
    fn pie_over_full_sample() {
        let spec = update_pie_chart(&controls(0.0, 10000.0, "ALL"), &Dataset::sample());
        assert_eq!(counts(&spec), [("1".to_string(), 3), ("0".to_string(), 2)]);
        assert_eq!(spec.title, "Launch Success Distribution (Payload: 0-10000 kg)");
    }

    #[test]
    fn pie_for_one_site_and_narrow_range() {
        let spec = update_pie_chart(&controls(1000.0, 2000.0, "CCAFS LC-40"), &Dataset::sample());
        assert_eq!(counts(&spec), [("1".to_string(), 2)]);
        assert_eq!(spec.pie_slices().unwrap()[0].outcome, Outcome::Success);
    }

    #[test]
    fn pie_with_empty_selection_has_no_slices() {
        let spec = update_pie_chart(&controls(5000.0, 10000.0, "ALL"), &Dataset::sample());
        assert!(spec.pie_slices().unwrap().is_empty());
        assert_eq!(spec.title, "Launch Success Distribution (Payload: 5000-10000 kg)");
    }

    #[test]
    fn pie_ties_keep_first_seen_order() {
        // Rows in range: 2000 kg failure, then 2500 kg success.
        let spec = update_pie_chart(&controls(2000.0, 2500.0, "ALL"), &Dataset::sample());
        assert_eq!(counts(&spec), [("0".to_string(), 1), ("1".to_string(), 1)]);

        let spec = update_pie_chart(&controls(1500.0, 2000.0, "ALL"), &Dataset::sample());
        assert_eq!(counts(&spec), [("0".to_string(), 1), ("1".to_string(), 1)]);
    }

    #[test]
    fn scatter_has_one_point_per_filtered_record() {
        let ds = Dataset::sample();
        for (min, max, site) in [
            (0.0, 10000.0, "ALL"),
            (1000.0, 2000.0, "CCAFS LC-40"),
            (2000.0, 3000.0, "VAFB SLC-4E"),
            (4000.0, 9000.0, "ALL"),
        ] {
            let c = controls(min, max, site);
            let filtered = filter(&ds, &c.payload_range, &c.site);
            let spec = update_scatter_plot(&c, &ds);
            let points = spec.scatter_points().unwrap();
            assert_eq!(points.len(), filtered.len());
            assert!(points.iter().all(|p| c.payload_range.contains(p.x)));
        }
    }

    #[test]
    fn scatter_passes_values_through() {
        let spec = update_scatter_plot(&controls(0.0, 10000.0, "ALL"), &Dataset::sample());
        let points = spec.scatter_points().unwrap();
        let first = &points[0];
        assert_eq!((first.x, first.y, first.category.as_str()), (1000.0, 1.0, "v1.0"));
        let second = &points[1];
        assert_eq!((second.x, second.y, second.category.as_str()), (2000.0, 0.0, "v1.1"));
        match &spec.kind {
            ChartKind::Scatter { x_label, y_label, .. } => {
                assert_eq!(x_label, "Payload Mass (kg)");
                assert_eq!(y_label, "Launch Outcome");
            }
            ChartKind::Pie { .. } => panic!("expected scatter"),
        }
    }

    #[test]
    fn scatter_title_depends_on_site() {
        let ds = Dataset::sample();
        let all = update_scatter_plot(&controls(0.0, 10000.0, "ALL"), &ds);
        assert_eq!(all.title, "Payload vs Success (All Sites)");
        let one = update_scatter_plot(&controls(0.0, 10000.0, "KSC LC-39A"), &ds);
        assert_eq!(one.title, "Payload vs Success for KSC LC-39A");
    }

    #[test]
    fn spec_serializes_with_type_tag() {
        let spec = update_pie_chart(&controls(0.0, 10000.0, "ALL"), &Dataset::sample());
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "pie");
        assert_eq!(json["slices"][0]["count"], 3);
        assert_eq!(json["slices"][0]["outcome"], 1);
    }
}
