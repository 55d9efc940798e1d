use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashboardApp {
    pub state: AppState,
}

impl LaunchDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered records ----
        egui::TopBottomPanel::bottom("records_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                table::records_table(ui, &self.state);
            });

        // ---- Central panel: the two charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &self.state;
            plot::chart_row(ui, |ui, i| {
                let id = state.layout.graphs[i];
                plot::chart(ui, id.as_str(), state.figure(id), &state.color_map);
            });
        });
    }
}
