use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{ChartKind, ChartSpec, PieSlice, ScatterPoint};
use crate::color::{outcome_color, ColorMap};

/// Largest arc drawn as one polygon; keeps every piece convex.
const MAX_WEDGE: f64 = TAU / 24.0;

// ---------------------------------------------------------------------------
// Chart region: title + figure
// ---------------------------------------------------------------------------

/// Render one figure in the available space.
pub fn chart(ui: &mut Ui, id: &str, spec: Option<&ChartSpec>, color_map: &ColorMap) {
    let Some(spec) = spec else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No figure");
        });
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&spec.title);
    });

    match &spec.kind {
        ChartKind::Pie { slices } => pie(ui, id, slices),
        ChartKind::Scatter {
            x_label,
            y_label,
            points,
        } => scatter(ui, id, x_label, y_label, points, color_map),
    }
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

fn pie(ui: &mut Ui, id: &str, slices: &[PieSlice]) {
    let total: usize = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("No data in selection");
        });
        return;
    }

    Plot::new(id)
        .legend(egui_plot::Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .show(ui, |plot_ui| {
            // Start at 12 o'clock, go clockwise.
            let mut start = TAU / 4.0;
            for slice in slices {
                let sweep = TAU * slice.count as f64 / total as f64;
                let color = outcome_color(slice.outcome);
                for piece in wedge_pieces(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(piece))
                            .name(&slice.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = start - sweep / 2.0;
                let pct = 100.0 * slice.count as f64 / total as f64;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                        format!("{pct:.1}%"),
                    )
                    .color(Color32::WHITE),
                );
                start -= sweep;
            }
        });
}

/// Split a clockwise arc of the unit circle into convex wedges.
fn wedge_pieces(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    // Tolerance so an exact multiple of MAX_WEDGE does not gain a sliver.
    let n = (sweep / MAX_WEDGE - 1e-9).ceil().max(1.0) as usize;
    let step = sweep / n as f64;
    (0..n)
        .map(|i| {
            let a0 = start - i as f64 * step;
            let a1 = a0 - step;
            let mut pts = vec![[0.0, 0.0]];
            // A few points per piece so the rim looks round.
            for k in 0..=4 {
                let a = a0 + (a1 - a0) * k as f64 / 4.0;
                pts.push([a.cos(), a.sin()]);
            }
            pts
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    points: &[ScatterPoint],
    color_map: &ColorMap,
) {
    // One series per booster category so the legend lists categories.
    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series.entry(p.category.as_str()).or_default().push([p.x, p.y]);
    }

    Plot::new(id)
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_y(-0.25)
        .include_y(1.25)
        .include_x(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, pts) in series {
                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .name(category)
                        .color(color_map.color_for(category))
                        .radius(5.0),
                );
            }
        });
}

/// Lay the two chart regions out side by side.
pub fn chart_row(ui: &mut Ui, render: impl Fn(&mut Ui, usize)) {
    ui.columns(2, |cols: &mut [Ui]| {
        for (i, col) in cols.iter_mut().enumerate() {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                render(ui, i);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_cover_the_sweep_in_convex_pieces() {
        let pieces = wedge_pieces(TAU / 4.0, TAU);
        assert_eq!(pieces.len(), 24);
        let first = &pieces[0];
        assert_eq!(first[0], [0.0, 0.0]);
        assert!((first[1][1] - 1.0).abs() < 1e-12);

        let small = wedge_pieces(0.0, 0.1);
        assert_eq!(small.len(), 1);
    }
}
