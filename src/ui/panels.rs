use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::SiteSelection;
use crate::layout::Handle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the payload range and launch-site controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    payload_range_control(ui, state);
    ui.add_space(12.0);
    site_dropdown(ui, state);
}

fn payload_range_control(ui: &mut Ui, state: &mut AppState) {
    let spec = state.layout.payload_slider.clone();
    let current = (
        state.controls.payload_range.min(),
        state.controls.payload_range.max(),
    );

    ui.label(spec.label);

    let (mut lo, mut hi) = current;
    let (lo_changed, hi_changed) = ui
        .push_id(spec.id.as_str(), |ui: &mut Ui| {
            let lo_changed = ui
                .add(
                    egui::Slider::new(&mut lo, spec.min..=spec.max)
                        .step_by(spec.step)
                        .suffix(" kg")
                        .text("from"),
                )
                .changed();
            let hi_changed = ui
                .add(
                    egui::Slider::new(&mut hi, spec.min..=spec.max)
                        .step_by(spec.step)
                        .suffix(" kg")
                        .text("to"),
                )
                .changed();
            (lo_changed, hi_changed)
        })
        .inner;

    let next = if lo_changed {
        spec.move_handle(current, Handle::Lower, lo)
    } else if hi_changed {
        spec.move_handle(current, Handle::Upper, hi)
    } else {
        current
    };
    if next != current {
        state.set_payload_range(next.0, next.1);
    }

    // Tick marks; the ones inside the selection are highlighted.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (value, label) in &spec.marks {
            let inside = state.controls.payload_range.contains(*value);
            let text = RichText::new(label).small();
            ui.label(if inside { text.strong() } else { text.weak() });
        }
    });
}

fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    let spec = state.layout.site_dropdown.clone();
    let current_token = state.controls.site.token().to_string();
    let selected_text = spec
        .label_for(&current_token)
        .unwrap_or(spec.placeholder)
        .to_string();

    ui.strong("Launch site");
    if spec.searchable {
        ui.add(egui::TextEdit::singleline(&mut state.site_query).hint_text(spec.placeholder));
    }

    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt(spec.id.as_str())
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in spec.matching(&state.site_query) {
                if ui
                    .selectable_label(option.value == current_token, &option.label)
                    .clicked()
                {
                    picked = Some(option.value.clone());
                }
            }
        });

    if let Some(token) = picked {
        state.site_query.clear();
        state.set_site(SiteSelection::from_token(&token));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export figures…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} launches, {} selected",
            state.source,
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export figures")
        .add_filter("JSON", &["json"])
        .set_file_name("figures.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_figures(&path) {
            log::error!("Failed to export figures: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
