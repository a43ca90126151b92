//! Descriptive statistics for numeric columns.

use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary statistics of one numeric column.
///
/// Fields are `None` when the statistic is undefined (no values, or a single
/// value for the standard deviation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Summarize the non-null values of a numeric Series.
    pub fn from_series(series: &Series) -> PolarsResult<Self> {
        let mut values = numeric_values(series)?;
        values.sort_by(f64::total_cmp);

        Ok(Self {
            column: series.name().to_string(),
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values.first().copied(),
            q25: quantile_sorted(&values, 0.25),
            median: quantile_sorted(&values, 0.5),
            q75: quantile_sorted(&values, 0.75),
            max: values.last().copied(),
        })
    }
}

/// Interquartile range and outlier fences of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub column: String,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub lower_fence: Option<f64>,
    pub upper_fence: Option<f64>,
    /// Values strictly outside the fences.
    pub outlier_count: usize,
}

impl IqrBounds {
    /// Compute quartiles and fences (`Q1 - k*IQR`, `Q3 + k*IQR`).
    pub fn from_series(series: &Series, multiplier: f64) -> PolarsResult<Self> {
        let mut values = numeric_values(series)?;
        values.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&values, 0.25);
        let q3 = quantile_sorted(&values, 0.75);
        let (iqr, lower_fence, upper_fence, outlier_count) = match (q1, q3) {
            (Some(q1), Some(q3)) => {
                let iqr = q3 - q1;
                let lower = q1 - multiplier * iqr;
                let upper = q3 + multiplier * iqr;
                let outliers = values.iter().filter(|v| **v < lower || **v > upper).count();
                (Some(iqr), Some(lower), Some(upper), outliers)
            }
            _ => (None, None, None, 0),
        };

        Ok(Self {
            column: series.name().to_string(),
            q1,
            q3,
            iqr,
            lower_fence,
            upper_fence,
            outlier_count,
        })
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Quantile of already sorted values using linear interpolation between the
/// closest ranks: position `q * (n - 1)`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let lo_val = *sorted.get(lo)?;
    let hi_val = *sorted.get(hi)?;
    Some(lo_val + (hi_val - lo_val) * (pos - lo as f64))
}
