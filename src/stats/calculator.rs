//! Statistics Calculator Module
//! Column-level numeric computations: descriptive stats, Pearson correlation,
//! histogram binning and box-plot summaries.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Whisker reach for box summaries, in interquartile ranges.
pub const WHISKER_IQR: f64 = 1.5;

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Box-plot geometry for one group of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Stateless numeric helpers over plain slices.
pub struct StatsCalculator;

impl StatsCalculator {
    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Compute descriptive statistics for an array of values.
    ///
    /// Returns `None` for an empty slice.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> Option<ColumnStats> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let sorted = Self::sorted(values);
        let mean = values.iter().mean();
        let std = if n > 1 {
            Some(values.iter().std_dev())
        } else {
            None
        };

        Some(ColumnStats {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation coefficient of two equally long samples.
    ///
    /// `None` when fewer than two pairs exist or either side has zero variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return None;
        }

        let cov = xs.iter().covariance(ys.iter());
        Some((cov / (sx * sy)).clamp(-1.0, 1.0))
    }

    /// Bin `values` into `bins` equal-width buckets over [min, max].
    ///
    /// The last bucket is closed on the right. A constant sample is binned over
    /// [v - 0.5, v + 0.5], an empty one over [0, 1].
    pub fn histogram(column: &str, values: &[f64], bins: usize) -> Histogram {
        let bins = bins.max(1);
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * width).collect();
        edges.push(hi);

        let mut counts = vec![0usize; bins];
        for &v in values {
            let mut idx = (((v - lo) / width) as usize).min(bins - 1);
            // the computed index can land one bin off the returned edges
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx < bins - 1 && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Histogram {
            column: column.to_string(),
            edges,
            counts,
        }
    }

    /// Quartiles, whiskers and outliers of one group. `None` for an empty group.
    pub fn box_stats(group: &str, values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let reach = WHISKER_IQR * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - reach)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + reach)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(BoxStats {
            group: group.to_string(),
            count: sorted.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}
