use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use trade_dash::data::filter::FilterColumn;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(sample) = &state.sample else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let options: Vec<(FilterColumn, Vec<String>)> = FilterColumn::ALL
        .into_iter()
        .map(|c| (c, sample.distinct_values(c.column()).to_vec()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (column, values) in &options {
                let column = *column;
                let n_selected = values
                    .iter()
                    .filter(|v| state.selection.is_selected(column, v))
                    .count();
                let header_text = format!("{}  ({n_selected}/{})", column.label(), values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        for value in values {
                            let mut checked = state.selection.is_selected(column, value);
                            let mut text = RichText::new(value);
                            if column == FilterColumn::Category
                                || column == FilterColumn::ImportExport
                            {
                                text = text.color(state.color(column.column(), value));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(column, value);
                            }
                        }
                    });
            }
        });
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
            let can_export = state.outcome.views().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export aggregates…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(sample) = &state.sample {
            ui.label(format!(
                "{} of {} rows sampled, {} visible",
                sample.len(),
                state.source_rows,
                state.visible_indices.len()
            ));
        }

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
        .set_title("Open transactions")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export aggregates")
        .set_file_name("aggregates.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.export_views(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export aggregates: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
