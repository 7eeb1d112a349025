use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::ColorMap;
use crate::page::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation menu
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(6.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("🚕 Taxi Analytics").strong());
    });
    ui.add_space(4.0);
    ui.separator();

    ui.strong("Navigation");
    ui.add_space(2.0);
    for page in Page::ALL {
        let text = RichText::new(format!("{}  {}", page.icon(), page.label())).size(15.0);
        if ui.selectable_label(state.page == page, text).clicked() {
            state.select_page(page);
        }
    }

    ui.separator();

    match &state.dataset {
        Some(ds) => {
            ui.label(format!("{} trips", ds.len()));
            if let Some(colors) = &state.color_map {
                color_legend(ui, colors);
            }
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
}

/// Legend swatches for the color categories.
fn color_legend(ui: &mut Ui, colors: &ColorMap) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (category, color) in colors.legend_entries() {
            ui.colored_label(color, "⏺");
            ui.label(category);
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
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                let _ = state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if let Some(path) = &state.source {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            ui.label(format!("{} trips loaded from {name}", state.row_count()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Page header / footer
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.label(
        RichText::new("📊 Taxi Dataset – Data Visualization with egui_plot")
            .size(24.0)
            .strong(),
    );
    ui.label("Explore trends, patterns, and insights using beautiful and interactive charts.");
    ui.add_space(6.0);
}

pub fn footer(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.separator();
    ui.label(RichText::new("💡 Built with eframe | egui_plot | Arrow").strong());
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open taxi trips")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let _ = state.open(&path);
    }
}
