//! Outlier analysis module.
//!
//! Computes IQR bounds for numeric columns. Values are reported, never
//! modified.

use crate::error::Result;
use crate::profiler::{IqrBounds, NameHeuristics};
use polars::prelude::*;
use tracing::debug;

/// Reports quartiles and outlier fences.
pub struct OutlierAnalyzer;

impl OutlierAnalyzer {
    /// IQR bounds for every numeric column that is neither a date candidate
    /// nor an identifier.
    pub fn iqr_report(
        df: &DataFrame,
        numeric_columns: &[String],
        heuristics: &NameHeuristics,
        multiplier: f64,
    ) -> Result<Vec<IqrBounds>> {
        let mut report = Vec::new();

        for col_name in numeric_columns {
            if heuristics.is_excluded_from_iqr(col_name) {
                debug!("Skipping IQR for {} (date/id column)", col_name);
                continue;
            }

            let series = df.column(col_name)?.as_materialized_series();
            let bounds = IqrBounds::from_series(series, multiplier)?;
            if bounds.outlier_count > 0 {
                debug!(
                    "{} values in {} fall outside the IQR fences",
                    bounds.outlier_count, col_name
                );
            }
            report.push(bounds);
        }

        Ok(report)
    }
}
