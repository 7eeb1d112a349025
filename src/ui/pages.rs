use eframe::egui::Ui;

use super::plot::{self, Chart, Mode};
use super::table;
use crate::charts::{Dashboard, PairCell, SIZE_BUCKETS};
use crate::color::{ColorMap, PRIMARY};
use crate::page::Page;
use crate::state::AppState;

const PAIR_CELL_HEIGHT: f32 = 170.0;

// ---------------------------------------------------------------------------
// Page dispatch (central panel)
// ---------------------------------------------------------------------------

/// Render the selected page in the central panel.
pub fn show(ui: &mut Ui, state: &AppState) {
    let (Some(dashboard), Some(colors)) = (&state.dashboard, &state.color_map) else {
        ui.add_space(40.0);
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading("Open a taxis dataset to start  (File → Open…)");
        });
        return;
    };

    if let Some(heading) = state.page.heading() {
        ui.heading(heading);
        ui.add_space(4.0);
    }

    match state.page {
        Page::Overview => overview(ui, dashboard),
        Page::Distribution => distribution(ui, dashboard),
        Page::Relationships => relationships(ui, dashboard, colors),
        Page::CategoricalAnalysis => categorical(ui, dashboard, colors),
        Page::InteractiveCharts => interactive(ui, dashboard, colors),
    }
}

fn overview(ui: &mut Ui, dashboard: &Dashboard) {
    ui.columns(2, |columns| {
        columns[0].heading("Dataset Preview");
        table::preview(&mut columns[0], &dashboard.overview);
        columns[1].heading("Dataset Info");
        table::describe(&mut columns[1], &dashboard.overview);
    });
}

fn distribution(ui: &mut Ui, dashboard: &Dashboard) {
    let d = &dashboard.distribution;

    Chart::new("total_histogram", Mode::Static)
        .title("Distribution of Total Fare")
        .axes("total", "Count")
        .show(ui, |plot_ui| {
            plot::histogram_bars(plot_ui, &d.total_histogram, PRIMARY, "total");
            plot::curve(plot_ui, &d.total_kde, PRIMARY.gamma_multiply(0.8), "density");
        });
    ui.add_space(8.0);

    Chart::new("tip_box", Mode::Static)
        .title("Tip Distribution (Box Plot)")
        .axes("", "tip")
        .without_legend()
        .show(ui, |plot_ui| {
            if let Some(stats) = &d.tip_box {
                plot::box_with_outliers(plot_ui, 0.0, stats, PRIMARY, "tip");
            }
        });
    ui.add_space(8.0);

    Chart::new("tip_violin", Mode::Static)
        .title("Tip Distribution (Violin Plot)")
        .axes("", "tip")
        .without_legend()
        .show(ui, |plot_ui| {
            plot::violin(
                plot_ui,
                0.0,
                &d.tip_violin.density,
                d.tip_violin.summary.as_ref(),
                0.4,
                PRIMARY,
                "tip",
            );
        });
}

fn relationships(ui: &mut Ui, dashboard: &Dashboard, colors: &ColorMap) {
    let r = &dashboard.relationships;

    Chart::new("total_vs_tip", Mode::Static)
        .title("Total Fare vs Tip")
        .axes("total", "tip")
        .without_legend()
        .show(ui, |plot_ui| {
            plot::scatter(plot_ui, &r.total_vs_tip, PRIMARY, 2.0, "trips");
        });
    ui.add_space(8.0);

    ui.strong("Pair Plot");
    let grid = &r.pair_grid;
    let n = grid.columns.len();
    for row in 0..n {
        ui.columns(n, |cells| {
            for (col, cell_ui) in cells.iter_mut().enumerate() {
                let id = format!("pair_{row}_{col}");
                let x_label = if row == n - 1 { grid.columns[col].name() } else { "" };
                let y_label = if col == 0 { grid.columns[row].name() } else { "" };
                Chart::new(&id, Mode::Static)
                    .axes(x_label, y_label)
                    .height(PAIR_CELL_HEIGHT)
                    .without_legend()
                    .show(cell_ui, |plot_ui| match grid.cell(row, col) {
                        PairCell::Histogram(h) => {
                            plot::histogram_bars(plot_ui, h, PRIMARY, grid.columns[col].name());
                        }
                        PairCell::Scatter(points) => {
                            plot::scatter(plot_ui, points, PRIMARY, 1.5, "");
                        }
                    });
            }
        });
    }
    ui.add_space(8.0);

    Chart::new("tip_fit_by_color", Mode::Static)
        .title("Tip vs Total Fare by Taxi Color")
        .axes("total", "tip")
        .show(ui, |plot_ui| {
            for fit in &r.fits {
                let color = colors.color_for(&fit.category);
                plot::scatter(plot_ui, &fit.points, color, 2.0, &fit.category);
                plot::band(plot_ui, &fit.band_lower, &fit.band_upper, color);
                plot::curve(plot_ui, &fit.line, color, &fit.category);
            }
        });
}

fn categorical(ui: &mut Ui, dashboard: &Dashboard, colors: &ColorMap) {
    let c = &dashboard.categorical;

    Chart::new("passenger_counts", Mode::Static)
        .title("Passenger Count Distribution")
        .axes("passengers", "count")
        .without_legend()
        .show(ui, |plot_ui| {
            let bars = c
                .passenger_counts
                .iter()
                .map(|&(passengers, count)| {
                    egui_plot::Bar::new(passengers as f64, count as f64)
                        .width(0.8)
                        .name(format!("{passengers} passengers"))
                })
                .collect();
            plot_ui.bar_chart(egui_plot::BarChart::new(bars).color(PRIMARY));
        });
    ui.add_space(8.0);

    Chart::new("tip_by_color", Mode::Static)
        .title("Average Tip by Taxi Color")
        .axes("color", "tip")
        .categories(c.tip_by_color.iter().map(|(category, _)| category.as_str()))
        .show(ui, |plot_ui| {
            for (i, (category, estimate)) in c.tip_by_color.iter().enumerate() {
                plot::bar_with_error(
                    plot_ui,
                    i as f64,
                    estimate.mean,
                    (estimate.ci_low, estimate.ci_high),
                    colors.color_for(category),
                    category,
                );
            }
        });
}

fn interactive(ui: &mut Ui, dashboard: &Dashboard, colors: &ColorMap) {
    let it = &dashboard.interactive;

    Chart::new("interactive_scatter", Mode::Interactive)
        .title("Total Fare vs Tip (Interactive)")
        .axes("total", "tip")
        .show(ui, |plot_ui| {
            for group in &it.scatter {
                let points: Vec<[f64; 2]> = group.points.iter().map(|p| [p.total, p.tip]).collect();
                plot::scatter(
                    plot_ui,
                    &points,
                    colors.color_for(&group.category),
                    marker_radius(group.size_bucket),
                    &group.category,
                );
            }
        });
    ui.label(format!(
        "Marker size grows with trip distance (cut points: {})",
        it.distance_edges
            .iter()
            .map(|e| format!("{e:.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    ui.add_space(8.0);

    Chart::new("interactive_histogram", Mode::Interactive)
        .title("Total Fare Distribution")
        .axes("total", "count")
        .without_legend()
        .show(ui, |plot_ui| {
            plot::histogram_bars(plot_ui, &it.total_histogram, PRIMARY, "total");
        });
    ui.add_space(8.0);

    Chart::new("interactive_tip_box", Mode::Interactive)
        .title("Tip Distribution by Taxi Color")
        .axes("color", "tip")
        .categories(it.tip_by_color.iter().map(|(category, _)| category.as_str()))
        .show(ui, |plot_ui| {
            for (i, (category, stats)) in it.tip_by_color.iter().enumerate() {
                plot::box_with_outliers(plot_ui, i as f64, stats, colors.color_for(category), category);
            }
        });
}

fn marker_radius(bucket: usize) -> f32 {
    1.5 + 4.5 * bucket.min(SIZE_BUCKETS - 1) as f32 / (SIZE_BUCKETS - 1) as f32
}
