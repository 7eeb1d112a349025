//! Precomputed chart data for every dashboard page.
//!
//! [`Dashboard::build`] runs once per loaded dataset; the UI only draws what
//! is stored here.

use std::collections::BTreeMap;

use crate::data::model::{CellValue, Column, NumericColumn, TaxiDataset};
use crate::data::stats::{
    bucket_edges, bucket_of, kde_curve, BoxStats, Histogram, LinearFit, MeanEstimate, Summary,
};

/// Rows shown in the overview preview table.
pub const PREVIEW_ROWS: usize = 5;
/// Bin count of the interactive fare histogram.
pub const INTERACTIVE_BINS: usize = 40;
/// Number of marker sizes in the interactive scatter.
pub const SIZE_BUCKETS: usize = 5;
/// Variables of the pair grid, in row/column order.
pub const PAIR_COLUMNS: [NumericColumn; 3] =
    [NumericColumn::Total, NumericColumn::Tip, NumericColumn::Distance];

const KDE_POINTS: usize = 200;
const VIOLIN_CUT: f64 = 2.0;
const FIT_POINTS: usize = 50;

// ---------------------------------------------------------------------------
// Per-page data
// ---------------------------------------------------------------------------

/// Dataset preview and `describe()` table.
#[derive(Debug, Clone)]
pub struct Overview {
    pub columns: Vec<&'static str>,
    pub preview: Vec<Vec<CellValue>>,
    pub summaries: Vec<(NumericColumn, Summary)>,
}

/// Fare histogram with density curve, tip box and violin.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub total_histogram: Histogram,
    /// KDE of `total` scaled to histogram counts.
    pub total_kde: Vec<[f64; 2]>,
    pub tip_box: Option<BoxStats>,
    pub tip_violin: Violin,
}

#[derive(Debug, Clone)]
pub struct Violin {
    /// `[value, density]` pairs.
    pub density: Vec<[f64; 2]>,
    /// Inner box.
    pub summary: Option<BoxStats>,
}

/// One panel of the pair grid.
#[derive(Debug, Clone)]
pub enum PairCell {
    Histogram(Histogram),
    Scatter(Vec<[f64; 2]>),
}

#[derive(Debug, Clone)]
pub struct PairGrid {
    pub columns: [NumericColumn; 3],
    /// Row-major; row = y variable, column = x variable.
    pub cells: Vec<PairCell>,
}

impl PairGrid {
    pub fn cell(&self, row: usize, col: usize) -> &PairCell {
        &self.cells[row * self.columns.len() + col]
    }
}

/// Regression of tip on total for one color category.
#[derive(Debug, Clone)]
pub struct HueFit {
    pub category: String,
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
    pub line: Vec<[f64; 2]>,
    /// 95% confidence band, sampled at the same x as `line`.
    pub band_lower: Vec<[f64; 2]>,
    pub band_upper: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct Relationships {
    pub total_vs_tip: Vec<[f64; 2]>,
    pub pair_grid: PairGrid,
    pub fits: Vec<HueFit>,
}

#[derive(Debug, Clone)]
pub struct Categorical {
    /// `(passengers, trips)` ascending by passenger count.
    pub passenger_counts: Vec<(i64, usize)>,
    pub tip_by_color: Vec<(String, MeanEstimate)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripPoint {
    pub total: f64,
    pub tip: f64,
    pub distance: f64,
}

/// Interactive scatter points sharing a color and a marker size.
#[derive(Debug, Clone)]
pub struct ScatterGroup {
    pub category: String,
    /// Distance bucket, `0..SIZE_BUCKETS`; larger means a longer trip.
    pub size_bucket: usize,
    pub points: Vec<TripPoint>,
}

#[derive(Debug, Clone)]
pub struct Interactive {
    pub scatter: Vec<ScatterGroup>,
    /// Inner distance cut points between size buckets.
    pub distance_edges: Vec<f64>,
    pub total_histogram: Histogram,
    pub tip_by_color: Vec<(String, BoxStats)>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Everything the five pages draw.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub rows: usize,
    pub overview: Overview,
    pub distribution: Distribution,
    pub relationships: Relationships,
    pub categorical: Categorical,
    pub interactive: Interactive,
}

impl Dashboard {
    pub fn build(dataset: &TaxiDataset) -> Self {
        Dashboard {
            rows: dataset.len(),
            overview: build_overview(dataset),
            distribution: build_distribution(dataset),
            relationships: build_relationships(dataset),
            categorical: build_categorical(dataset),
            interactive: build_interactive(dataset),
        }
    }
}

fn build_overview(dataset: &TaxiDataset) -> Overview {
    Overview {
        columns: Column::ALL.iter().map(|c| c.name()).collect(),
        preview: dataset.head(PREVIEW_ROWS),
        summaries: NumericColumn::ALL
            .iter()
            .filter_map(|&col| Summary::from_values(&col.values(dataset)).map(|s| (col, s)))
            .collect(),
    }
}

fn build_distribution(dataset: &TaxiDataset) -> Distribution {
    let totals = NumericColumn::Total.values(dataset);
    let tips = NumericColumn::Tip.values(dataset);

    let total_histogram = Histogram::auto(&totals);
    let scale = total_histogram.total() as f64 * total_histogram.bin_width();
    let total_kde = kde_curve(&totals, 0.0, KDE_POINTS)
        .into_iter()
        .map(|[x, d]| [x, d * scale])
        .collect();

    let tip_box = BoxStats::from_values(&tips);
    Distribution {
        total_histogram,
        total_kde,
        tip_violin: Violin {
            density: kde_curve(&tips, VIOLIN_CUT, KDE_POINTS),
            summary: tip_box.clone(),
        },
        tip_box,
    }
}

fn build_relationships(dataset: &TaxiDataset) -> Relationships {
    let total_vs_tip = dataset.trips.iter().map(|t| [t.total, t.tip]).collect();

    let columns: Vec<Vec<f64>> = PAIR_COLUMNS.iter().map(|c| c.values(dataset)).collect();
    let mut cells = Vec::with_capacity(PAIR_COLUMNS.len() * PAIR_COLUMNS.len());
    for (row, ys) in columns.iter().enumerate() {
        for (col, xs) in columns.iter().enumerate() {
            if row == col {
                cells.push(PairCell::Histogram(Histogram::auto(xs)));
            } else {
                cells.push(PairCell::Scatter(
                    xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect(),
                ));
            }
        }
    }

    let fits = dataset
        .colors
        .iter()
        .map(|category| hue_fit(dataset, category))
        .collect();

    Relationships {
        total_vs_tip,
        pair_grid: PairGrid {
            columns: PAIR_COLUMNS,
            cells,
        },
        fits,
    }
}

fn hue_fit(dataset: &TaxiDataset, category: &str) -> HueFit {
    let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
        .trips_with_color(category)
        .map(|t| (t.total, t.tip))
        .unzip();
    let points = xs.iter().zip(&ys).map(|(&x, &y)| [x, y]).collect();
    let fit = LinearFit::fit(&xs, &ys);

    let (mut line, mut band_upper, mut band_lower) = (Vec::new(), Vec::new(), Vec::new());
    if let Some(fit) = &fit {
        let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for i in 0..FIT_POINTS {
            let x = lo + (hi - lo) * i as f64 / (FIT_POINTS - 1) as f64;
            let y = fit.predict(x);
            let half = fit.ci_half_width(x);
            line.push([x, y]);
            band_upper.push([x, y + half]);
            band_lower.push([x, y - half]);
        }
    }

    HueFit {
        category: category.to_string(),
        points,
        fit,
        line,
        band_lower,
        band_upper,
    }
}

fn build_categorical(dataset: &TaxiDataset) -> Categorical {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for trip in &dataset.trips {
        *counts.entry(trip.passengers).or_default() += 1;
    }

    let tip_by_color = dataset
        .colors
        .iter()
        .filter_map(|category| {
            let tips: Vec<f64> = dataset.trips_with_color(category).map(|t| t.tip).collect();
            MeanEstimate::from_values(&tips).map(|e| (category.clone(), e))
        })
        .collect();

    Categorical {
        passenger_counts: counts.into_iter().collect(),
        tip_by_color,
    }
}

fn build_interactive(dataset: &TaxiDataset) -> Interactive {
    let distances = NumericColumn::Distance.values(dataset);
    let distance_edges = bucket_edges(&distances, SIZE_BUCKETS);

    let mut groups: BTreeMap<(String, usize), Vec<TripPoint>> = BTreeMap::new();
    for trip in &dataset.trips {
        let bucket = bucket_of(&distance_edges, trip.distance);
        groups
            .entry((trip.color.clone(), bucket))
            .or_default()
            .push(TripPoint {
                total: trip.total,
                tip: trip.tip,
                distance: trip.distance,
            });
    }
    let scatter = groups
        .into_iter()
        .map(|((category, size_bucket), points)| ScatterGroup {
            category,
            size_bucket,
            points,
        })
        .collect();

    let tip_by_color = dataset
        .colors
        .iter()
        .filter_map(|category| {
            let tips: Vec<f64> = dataset.trips_with_color(category).map(|t| t.tip).collect();
            BoxStats::from_values(&tips).map(|b| (category.clone(), b))
        })
        .collect();

    Interactive {
        scatter,
        distance_edges,
        total_histogram: Histogram::new(&NumericColumn::Total.values(dataset), INTERACTIVE_BINS),
        tip_by_color,
    }
}
