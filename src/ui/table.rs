use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::outcome_color;
use crate::data::filter::format_mass;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Table of the records passing the current filters.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let records = state.dataset.records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Launch site", "Payload mass (kg)", "Class", "Booster version"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let rec = &records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.launch_site);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format_mass(rec.payload_mass));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(rec.outcome.to_string()).color(outcome_color(rec.outcome)),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.booster_category);
                });
            });
        });
}
