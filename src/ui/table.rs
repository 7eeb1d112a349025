use eframe::egui::{self, Align, Layout, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::charts::Overview;
use crate::data::stats::Summary;

const ROW_HEIGHT: f32 = 18.0;

/// First rows of the dataset, every column.
pub fn preview(ui: &mut Ui, overview: &Overview) {
    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(TableColumn::auto().at_least(48.0), overview.columns.len() + 1)
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    header.col(|_ui| {});
                    for name in &overview.columns {
                        header.col(|ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|mut body| {
                    for (i, row) in overview.preview.iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui| {
                                ui.weak(i.to_string());
                            });
                            for cell in row {
                                table_row.col(|ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });
}

/// `describe()` layout: one column per numeric column, one row per statistic.
pub fn describe(ui: &mut Ui, overview: &Overview) {
    let rows: [(&str, fn(&Summary) -> String); 8] = [
        ("count", |s| format!("{:.1}", s.count as f64)),
        ("mean", |s| format!("{:.4}", s.mean)),
        ("std", |s| s.std.map_or_else(|| "NaN".to_string(), |v| format!("{v:.4}"))),
        ("min", |s| format!("{:.4}", s.min)),
        ("25%", |s| format!("{:.4}", s.q1)),
        ("50%", |s| format!("{:.4}", s.median)),
        ("75%", |s| format!("{:.4}", s.q3)),
        ("max", |s| format!("{:.4}", s.max)),
    ];

    ScrollArea::horizontal()
        .id_salt("describe_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("describe_grid")
                .striped(true)
                .min_col_width(56.0)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for (column, _) in &overview.summaries {
                        ui.strong(column.name());
                    }
                    ui.end_row();

                    for (stat, render) in rows {
                        ui.strong(stat);
                        for (_, summary) in &overview.summaries {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                                ui.monospace(render(summary));
                            });
                        }
                        ui.end_row();
                    }
                });
        });
}
