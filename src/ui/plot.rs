use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape,
    Plot, PlotPoints, PlotUi, Points, Polygon,
};

use crate::data::stats::{BoxStats, Histogram};

pub const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Chart frame
// ---------------------------------------------------------------------------

/// Static charts behave like rendered figures; interactive ones pan, zoom
/// and label hovered points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Static,
    Interactive,
}

/// A titled plot area.
pub struct Chart<'s> {
    id: &'s str,
    title: Option<&'s str>,
    x_label: &'s str,
    y_label: &'s str,
    height: f32,
    mode: Mode,
    legend: bool,
    categories: Option<Vec<String>>,
}

impl<'s> Chart<'s> {
    pub fn new(id: &'s str, mode: Mode) -> Self {
        Self {
            id,
            title: None,
            x_label: "",
            y_label: "",
            height: CHART_HEIGHT,
            mode,
            legend: true,
            categories: None,
        }
    }

    pub fn title(mut self, title: &'s str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn axes(mut self, x_label: &'s str, y_label: &'s str) -> Self {
        self.x_label = x_label;
        self.y_label = y_label;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.legend = false;
        self
    }

    /// Label x = 0, 1, 2, ... with these names instead of numbers.
    pub fn categories(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.categories = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn show(self, ui: &mut Ui, add: impl FnOnce(&mut PlotUi)) {
        if let Some(title) = self.title {
            ui.label(RichText::new(title).strong());
        }

        let mut plot = Plot::new(self.id)
            .height(self.height)
            .x_axis_label(self.x_label)
            .y_axis_label(self.y_label);
        if self.legend {
            plot = plot.legend(Legend::default());
        }
        if let Some(names) = self.categories {
            plot = plot
                .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
                .x_axis_formatter(move |mark, _range| category_label(&names, mark.value));
        }

        plot = match self.mode {
            Mode::Static => plot
                .allow_boxed_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_zoom(false)
                .allow_double_click_reset(false)
                .show_x(false)
                .show_y(false),
            Mode::Interactive => plot
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_scroll(true)
                .allow_zoom(true)
                .label_formatter(|name, value| {
                    if name.is_empty() {
                        format!("x = {:.2}\ny = {:.2}", value.x, value.y)
                    } else {
                        format!("{name}\nx = {:.2}\ny = {:.2}", value.x, value.y)
                    }
                }),
        };

        plot.show(ui, add);
    }
}

/// Name for an x position on a categorical axis; blank between categories.
pub fn category_label(names: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Drawing primitives
// ---------------------------------------------------------------------------

/// One bar per histogram bin, touching its neighbours.
pub fn histogram_bars(plot_ui: &mut PlotUi, hist: &Histogram, color: Color32, name: &str) {
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .map(|(center, count)| {
            Bar::new(center, count as f64)
                .width(width)
                .stroke(Stroke::new(0.5, Color32::WHITE))
        })
        .collect();
    plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
}

pub fn curve(plot_ui: &mut PlotUi, points: &[[f64; 2]], color: Color32, name: &str) {
    if points.is_empty() {
        return;
    }
    plot_ui.line(
        Line::new(PlotPoints::new(points.to_vec()))
            .color(color)
            .width(2.0)
            .name(name),
    );
}

pub fn scatter(plot_ui: &mut PlotUi, points: &[[f64; 2]], color: Color32, radius: f32, name: &str) {
    plot_ui.points(
        Points::new(PlotPoints::new(points.to_vec()))
            .color(color.gamma_multiply(0.7))
            .radius(radius)
            .shape(MarkerShape::Circle)
            .filled(true)
            .name(name),
    );
}

/// Box at `argument` with whiskers and outlier markers.
pub fn box_with_outliers(
    plot_ui: &mut PlotUi,
    argument: f64,
    stats: &BoxStats,
    color: Color32,
    name: &str,
) {
    let elem = BoxElem::new(
        argument,
        BoxSpread::new(
            stats.lower_whisker,
            stats.q1,
            stats.median,
            stats.q3,
            stats.upper_whisker,
        ),
    )
    .name(name)
    .box_width(0.5)
    .whisker_width(0.25)
    .fill(color.linear_multiply(0.3))
    .stroke(Stroke::new(1.5, color));
    plot_ui.box_plot(BoxPlot::new(vec![elem]).color(color).name(name));

    if !stats.outliers.is_empty() {
        let points: Vec<[f64; 2]> = stats.outliers.iter().map(|&y| [argument, y]).collect();
        plot_ui.points(
            Points::new(PlotPoints::new(points))
                .color(color)
                .radius(2.5)
                .shape(MarkerShape::Diamond),
        );
    }
}

/// Mirrored density around `argument`, scaled to `half_width` at its widest,
/// with a slim box inside.
pub fn violin(
    plot_ui: &mut PlotUi,
    argument: f64,
    density: &[[f64; 2]],
    inner: Option<&BoxStats>,
    half_width: f64,
    color: Color32,
    name: &str,
) {
    let max_density = density.iter().map(|p| p[1]).fold(0.0, f64::max);
    if max_density <= 0.0 {
        return;
    }
    let widths: Vec<[f64; 2]> = density
        .iter()
        .map(|&[y, d]| [y, d / max_density * half_width])
        .collect();

    // Egui fills convex polygons only, so the body is a stack of trapezoids.
    for pair in widths.windows(2) {
        let ([y0, w0], [y1, w1]) = (pair[0], pair[1]);
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(vec![
                [argument - w0, y0],
                [argument + w0, y0],
                [argument + w1, y1],
                [argument - w1, y1],
            ]))
            .fill_color(color.linear_multiply(0.3))
            .stroke(Stroke::NONE),
        );
    }
    let right: Vec<[f64; 2]> = widths.iter().map(|&[y, w]| [argument + w, y]).collect();
    let left: Vec<[f64; 2]> = widths.iter().map(|&[y, w]| [argument - w, y]).collect();
    plot_ui.line(Line::new(PlotPoints::new(right)).color(color).width(1.5).name(name));
    plot_ui.line(Line::new(PlotPoints::new(left)).color(color).width(1.5));

    if let Some(stats) = inner {
        let box_half = half_width * 0.08;
        plot_ui.line(
            Line::new(PlotPoints::new(vec![
                [argument, stats.lower_whisker],
                [argument, stats.upper_whisker],
            ]))
            .color(Color32::DARK_GRAY)
            .width(1.5),
        );
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(vec![
                [argument - box_half, stats.q1],
                [argument + box_half, stats.q1],
                [argument + box_half, stats.q3],
                [argument - box_half, stats.q3],
            ]))
            .fill_color(Color32::DARK_GRAY)
            .stroke(Stroke::new(1.0, Color32::DARK_GRAY)),
        );
        plot_ui.points(
            Points::new(PlotPoints::new(vec![[argument, stats.median]]))
                .color(Color32::WHITE)
                .radius(3.0),
        );
    }
}

/// Shaded region between two curves sampled at the same x values.
pub fn band(plot_ui: &mut PlotUi, lower: &[[f64; 2]], upper: &[[f64; 2]], color: Color32) {
    for (lo, hi) in lower.windows(2).zip(upper.windows(2)) {
        plot_ui.polygon(
            Polygon::new(PlotPoints::new(vec![lo[0], lo[1], hi[1], hi[0]]))
                .fill_color(color.linear_multiply(0.15))
                .stroke(Stroke::NONE),
        );
    }
}

/// A single bar with a vertical error bar from `low` to `high`.
pub fn bar_with_error(
    plot_ui: &mut PlotUi,
    argument: f64,
    value: f64,
    (low, high): (f64, f64),
    color: Color32,
    name: &str,
) {
    let bar = Bar::new(argument, value).width(0.6).name(name);
    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(name));

    let cap = 0.1;
    let whisker = Color32::from_gray(60);
    plot_ui.line(Line::new(PlotPoints::new(vec![[argument, low], [argument, high]])).color(whisker).width(2.0));
    plot_ui.line(
        Line::new(PlotPoints::new(vec![[argument - cap, high], [argument + cap, high]]))
            .color(whisker)
            .width(2.0),
    );
    plot_ui.line(
        Line::new(PlotPoints::new(vec![[argument - cap, low], [argument + cap, low]]))
            .color(whisker)
            .width(2.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_axis_names_integer_marks_only() {
        let names = vec!["yellow".to_string(), "green".to_string()];
        assert_eq!(category_label(&names, 0.0), "yellow");
        assert_eq!(category_label(&names, 1.0), "green");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, 2.0), "");
        assert_eq!(category_label(&names, -1.0), "");
    }
}
