use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use trade_dash::data::model::{Column, VALUE_HEADER};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the rows passing the current filters.
pub fn transactions_table(ui: &mut Ui, state: &AppState) {
    let Some(sample) = &state.sample else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(TableColumn::auto().at_least(80.0), Column::ALL.len())
        .column(TableColumn::remainder())
        .max_scroll_height(320.0)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for column in Column::ALL {
                header.col(|ui| {
                    ui.strong(column.header());
                });
            }
            header.col(|ui| {
                ui.strong(VALUE_HEADER);
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let Some(tx) = state
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| sample.row(i))
                else {
                    return;
                };
                for column in Column::ALL {
                    row.col(|ui| {
                        ui.label(tx.get(column));
                    });
                }
                row.col(|ui| {
                    match tx.value {
                        Some(v) => ui.label(format!("{v:.2}")),
                        None => ui.weak("–"),
                    };
                });
            });
        });
}
