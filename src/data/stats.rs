//! Statistical helpers behind the charts.
//!
//! Everything here works on plain `&[f64]` slices and silently skips
//! non-finite values, so callers can pass a raw column.

// ---------------------------------------------------------------------------
// Basic moments and quantiles
// ---------------------------------------------------------------------------

/// Finite values, sorted ascending.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sample standard deviation (ddof = 1).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let (ss, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1));
    (n > 1).then(|| (ss / (n - 1) as f64).sqrt())
}

/// Quantile of already-sorted data, linear interpolation between the two
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Count, moments and five-number summary of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        Some(Summary {
            count: sorted.len(),
            mean: mean(&sorted)?,
            std: std_dev(&sorted),
            min: *sorted.first()?,
            q1: quantile(&sorted, 0.25)?,
            median: quantile(&sorted, 0.5)?,
            q3: quantile(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Upper bound on [`auto_bin_count`].
pub const MAX_AUTO_BINS: usize = 1_000;

/// Bin count chosen by numpy's `"auto"` rule: the smaller of the
/// Freedman-Diaconis and Sturges bin widths, Sturges alone when the IQR is 0.
/// A Freedman-Diaconis count above [`MAX_AUTO_BINS`] (a narrow IQR next to
/// far outliers) also falls back to Sturges.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return 1;
    };
    let range = max - min;
    if !(range > 0.0 && range.is_finite()) {
        return 1;
    }

    let n = sorted.len() as f64;
    let sturges_bins = (n.log2() + 1.0).ceil();
    let iqr = quantile(&sorted, 0.75).unwrap_or(max) - quantile(&sorted, 0.25).unwrap_or(min);
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let fd_bins = (range / fd_width).ceil();

    let bins = if fd_width > 0.0 && fd_bins.is_finite() && fd_bins <= MAX_AUTO_BINS as f64 {
        fd_bins.max(sturges_bins)
    } else {
        sturges_bins
    };
    (bins as usize).clamp(1, MAX_AUTO_BINS)
}

/// Equal-width histogram. Bins are half-open except the last, which
/// includes the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let sorted = sorted_finite(values);
        let (mut lo, mut hi) = match (sorted.first(), sorted.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 1.0),
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        edges[bins] = hi;

        let mut counts = vec![0usize; bins];
        for v in sorted {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    /// Histogram with [`auto_bin_count`] bins.
    pub fn auto(values: &[f64]) -> Self {
        Self::new(values, auto_bin_count(values))
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// `(center, count)` per bin.
    pub fn centers(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| ((w[0] + w[1]) / 2.0, c))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Kernel density estimation
// ---------------------------------------------------------------------------

/// Scott's rule bandwidth for a Gaussian kernel: `std * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.iter().filter(|v| v.is_finite()).count();
    let bw = std_dev(values)? * (n as f64).powf(-0.2);
    (bw > 0.0).then_some(bw)
}

/// Gaussian KDE of `values` evaluated at `x`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| {
            let u = (x - v) / bandwidth;
            (s + (-0.5 * u * u).exp(), n + 1)
        });
    if n == 0 {
        return 0.0;
    }
    sum * INV_SQRT_2PI / (n as f64 * bandwidth)
}

/// `[x, density]` pairs on an even grid spanning the data extended by
/// `cut` bandwidths on each side. Empty when the bandwidth is undefined.
pub fn kde_curve(values: &[f64], cut: f64, grid_points: usize) -> Vec<[f64; 2]> {
    let sorted = sorted_finite(values);
    let (Some(&min), Some(&max), Some(bw)) = (sorted.first(), sorted.last(), scott_bandwidth(&sorted))
    else {
        return Vec::new();
    };

    let lo = min - cut * bw;
    let hi = max + cut * bw;
    let steps = grid_points.max(2) - 1;
    (0..=steps)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / steps as f64;
            [x, gaussian_kde(&sorted, bw, x)]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box statistics
// ---------------------------------------------------------------------------

/// Box-and-whisker statistics. Whiskers stop at the most extreme data points
/// within 1.5 IQR of the box; anything beyond is an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect();

        Some(BoxStats {
            count: sorted.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            mean: mean(&sorted)?,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Regression and interval estimates
// ---------------------------------------------------------------------------

/// z for a two-sided 95% interval.
const Z_95: f64 = 1.959_963_984_540_054;

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    n: usize,
    x_mean: f64,
    sxx: f64,
    residual_se: f64,
}

impl LinearFit {
    /// Fit over the pairs where both coordinates are finite. `None` with
    /// fewer than two points or no spread in `x`.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let n = pairs.len();
        if n < 2 {
            return None;
        }

        let x_mean = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let y_mean = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let sxx: f64 = pairs.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
        let sxy: f64 = pairs.iter().map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();
        if sxx <= 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let sse: f64 = pairs
            .iter()
            .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
            .sum();
        let residual_se = if n > 2 { (sse / (n - 2) as f64).sqrt() } else { 0.0 };

        Some(LinearFit {
            slope,
            intercept,
            n,
            x_mean,
            sxx,
            residual_se,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Half-width of the 95% confidence interval of the fitted mean at `x`.
    pub fn ci_half_width(&self, x: f64) -> f64 {
        Z_95 * self.residual_se * (1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx).sqrt()
    }
}

/// Sample mean with a 95% normal-approximation confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanEstimate {
    pub count: usize,
    pub mean: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl MeanEstimate {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let m = mean(values)?;
        let n = values.iter().filter(|v| v.is_finite()).count();
        let half = std_dev(values)
            .map(|sd| Z_95 * sd / (n as f64).sqrt())
            .unwrap_or(0.0);
        Some(MeanEstimate {
            count: n,
            mean: m,
            ci_low: m - half,
            ci_high: m + half,
        })
    }
}

// ---------------------------------------------------------------------------
// Quantile buckets
// ---------------------------------------------------------------------------

/// Inner cut points splitting `values` into `k` equally populated buckets.
pub fn bucket_edges(values: &[f64], k: usize) -> Vec<f64> {
    let sorted = sorted_finite(values);
    (1..k.max(1))
        .filter_map(|i| quantile(&sorted, i as f64 / k as f64))
        .collect()
}

/// Index of the bucket `v` falls into, `0..=edges.len()`.
pub fn bucket_of(edges: &[f64], v: f64) -> usize {
    edges.iter().take_while(|&&e| v > e).count()
}
