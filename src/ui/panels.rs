use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use bracket_lens::state::AppState;

use super::selectors;

// ---------------------------------------------------------------------------
// Left side panel – selector widgets
// ---------------------------------------------------------------------------

/// Render the left selector panel. Events are collected first and handed to
/// the state once every widget has drawn.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut events = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Year");
            events.extend(selectors::year_strip(ui, &mut state.years));
            ui.add_space(6.0);

            ui.strong("Seed");
            events.extend(selectors::seed_grid(ui, &mut state.seeds));
            ui.add_space(6.0);

            if let Some(win_pct) = &mut state.win_pct {
                ui.strong("Win %");
                events.extend(selectors::linear_brush(ui, win_pct));
                ui.add_space(6.0);
            }

            for metric in &mut state.linear {
                egui::CollapsingHeader::new(RichText::new(&metric.label).strong())
                    .id_salt(metric.selector.metric().to_string())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        events.extend(selectors::linear_brush(ui, &mut metric.selector));
                    });
            }

            for metric in &mut state.angular {
                egui::CollapsingHeader::new(RichText::new(&metric.label).strong())
                    .id_salt(metric.selector.metric().to_string())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        events.extend(selectors::angular_arc(ui, &mut metric.selector));
                    });
            }

            ui.separator();
            ui.strong("Conferences");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for (conference, color) in state.colors.legend_entries() {
                    ui.label(RichText::new("●").color(color));
                    ui.label(conference);
                }
            });
        });

    state.dispatch_all(events);
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} teams loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            ui.separator();
            ui.label(RichText::new(state.filters().describe()).weak());

            if ui
                .add_enabled(!state.filters().is_empty(), egui::Button::new("Reset filters"))
                .clicked()
            {
                state.reset_all();
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open team data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

pub fn load_into(state: &mut AppState, path: &Path) {
    match bracket_lens::data::loader::load_file(path) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
