//! Histogram binning and density curves.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::profiler::sample_std;

/// Bin counts of one histogram panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistogramBins {
    /// Equal-width bins; bin `i` covers `[start + i*width, start + (i+1)*width)`.
    Numeric {
        start: f64,
        width: f64,
        counts: Vec<usize>,
    },
    /// One bar per distinct value, in order of first appearance.
    Categorical {
        labels: Vec<String>,
        counts: Vec<usize>,
    },
}

impl HistogramBins {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric { counts, .. } | Self::Categorical { counts, .. } => counts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of values counted.
    pub fn total(&self) -> usize {
        match self {
            Self::Numeric { counts, .. } | Self::Categorical { counts, .. } => counts.iter().sum(),
        }
    }
}

/// Sturges' rule: `ceil(log2 n) + 1` bins, at least one.
pub fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Bin numeric values into `bins` equal-width bins from min to max.
///
/// A constant column gets a single bin of width 1 centred on the value.
pub fn numeric_histogram(values: &[f64], bins: usize) -> HistogramBins {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return HistogramBins::Numeric {
            start: 0.0,
            width: 0.0,
            counts: Vec::new(),
        };
    };

    if (max - min).abs() < f64::EPSILON {
        return HistogramBins::Numeric {
            start: min - 0.5,
            width: 1.0,
            counts: vec![values.len()],
        };
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    HistogramBins::Numeric {
        start: min,
        width,
        counts,
    }
}

/// Count string values in order of first appearance.
pub fn categorical_histogram<'a, I>(values: I) -> HistogramBins
where
    I: IntoIterator<Item = &'a str>,
{
    let mut labels: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for value in values {
        match labels.iter().position(|l| l == value) {
            Some(idx) => counts[idx] += 1,
            None => {
                labels.push(value.to_string());
                counts.push(1);
            }
        }
    }
    HistogramBins::Categorical { labels, counts }
}

/// Gaussian kernel density estimate scaled to histogram counts.
///
/// Bandwidth follows Scott's rule (`sigma * n^(-1/5)`); the curve is
/// multiplied by `n * bin_width` so it overlays the bars. Evaluated at
/// `points` positions from `min - 3h` to `max + 3h`. Empty when fewer than two
/// values or no spread.
pub fn gaussian_kde(values: &[f64], bin_width: f64, points: usize) -> Vec<[f64; 2]> {
    let n = values.len();
    let Some(sigma) = sample_std(values) else {
        return Vec::new();
    };
    if sigma <= 0.0 || points < 2 {
        return Vec::new();
    }

    let h = sigma * (n as f64).powf(-0.2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * h;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * h;
    let step = (max - min) / (points - 1) as f64;
    let norm = bin_width / (h * (2.0 * PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let y = norm
                * values
                    .iter()
                    .map(|xi| {
                        let z = (x - xi) / h;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>();
            [x, y]
        })
        .collect()
}
