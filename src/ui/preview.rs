use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::CustomerTable;

/// Table of the first `limit` rows in `rows`.
pub fn data_preview(ui: &mut Ui, table: &CustomerTable, rows: &[usize], limit: usize) {
    let names = table.column_names();
    let columns: Vec<_> = names.iter().filter_map(|n| table.column(n).ok()).collect();
    let shown = rows.len().min(limit);

    ui.label(format!("Showing {shown} of {} rows", rows.len()));

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(true)
                .max_scroll_height(300.0)
                .columns(TableColumn::auto().at_least(60.0), columns.len())
                .header(20.0, |mut header| {
                    for col in &columns {
                        header.col(|ui| {
                            ui.strong(&col.name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, shown, |mut row| {
                        let idx = rows[row.index()];
                        for col in &columns {
                            row.col(|ui| {
                                ui.label(col.values[idx].to_string());
                            });
                        }
                    });
                });
        });
}
