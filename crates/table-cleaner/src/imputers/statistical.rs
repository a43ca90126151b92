//! Statistical imputation methods.
//!
//! Provides mean, median, mode, forward-fill and zero-fill for single columns.
//! Every method reports what it did as a [`FillRecord`].

use crate::error::{CleaningError, Result};
use crate::types::{FillMethod, FillRecord, ImputationPass};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_numeric_dtype, nan_to_null, string_mode,
};
use polars::prelude::*;
use tracing::warn;

/// Fill value used when a numeric statistic has no values to work on.
pub const EMPTY_NUMERIC_FALLBACK: f64 = 0.0;

/// Fill value used when a string column has no values to take a mode from.
pub const EMPTY_MODE_FALLBACK: &str = "";

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with its mean (0.0 when every value is missing).
    ///
    /// Float NaN counts as missing: it is left out of the mean and filled.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        pass: ImputationPass,
    ) -> Result<FillRecord> {
        let series = nan_to_null(&Self::series(df, col_name)?)?;
        let mean_val = series.mean().unwrap_or(EMPTY_NUMERIC_FALLBACK);
        Self::fill_with_value(df, col_name, series, mean_val, pass, FillMethod::Mean)
    }

    /// Fill a numeric column with its median (0.0 when every value is missing).
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        pass: ImputationPass,
    ) -> Result<FillRecord> {
        let series = nan_to_null(&Self::series(df, col_name)?)?;
        let median_val = series.median().unwrap_or(EMPTY_NUMERIC_FALLBACK);
        Self::fill_with_value(df, col_name, series, median_val, pass, FillMethod::Median)
    }

    /// Fill a string column with its most frequent value (`""` when there is none).
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        pass: ImputationPass,
    ) -> Result<FillRecord> {
        let series = Self::series(df, col_name)?;
        let mode_val = string_mode(&series).unwrap_or_else(|| EMPTY_MODE_FALLBACK.to_string());
        let nulls_before = series.null_count();

        if nulls_before > 0 {
            let filled = fill_string_nulls(&series, &mode_val)?;
            df.replace(col_name, filled)?;
        }

        Ok(FillRecord {
            column: col_name.to_string(),
            pass,
            method: FillMethod::Mode,
            value: Some(mode_val),
            nulls_before,
            nulls_after: 0,
        })
    }

    /// Propagate the last non-missing value downward.
    ///
    /// Leading nulls have nothing to copy and stay null.
    pub fn apply_forward_fill(
        df: &mut DataFrame,
        col_name: &str,
        pass: ImputationPass,
    ) -> Result<FillRecord> {
        let series = Self::series(df, col_name)?;
        let nulls_before = series.null_count();
        let mut nulls_after = nulls_before;

        if nulls_before > 0 {
            let filled = series.fill_null(FillNullStrategy::Forward(None))?;
            nulls_after = filled.null_count();
            df.replace(col_name, filled)?;
        }

        Ok(FillRecord {
            column: col_name.to_string(),
            pass,
            method: FillMethod::ForwardFill,
            value: None,
            nulls_before,
            nulls_after,
        })
    }

    /// Fill with the zero of the column's own type.
    ///
    /// Temporal columns get their physical zero (the Unix epoch), booleans get
    /// `false`, an all-null column becomes Int32 zeros and string-like columns
    /// get `"0"`. Nested types are left untouched.
    pub fn apply_zero_fill(
        df: &mut DataFrame,
        col_name: &str,
        pass: ImputationPass,
    ) -> Result<FillRecord> {
        let series = Self::series(df, col_name)?;
        let nulls_before = series.null_count();
        let name = series.name().clone();
        let len = series.len();

        let filled: Option<Series> = if nulls_before == 0 {
            None
        } else {
            match series.dtype() {
                DataType::Null => Some(Series::new(name, vec![0i32; len])),
                DataType::Boolean => {
                    let values: Vec<bool> = series
                        .bool()?
                        .into_iter()
                        .map(|v| v.unwrap_or(false))
                        .collect();
                    Some(Series::new(name, values))
                }
                DataType::Date | DataType::Datetime(_, _) | DataType::Duration(_) | DataType::Time => {
                    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
                    let values: Vec<i64> = physical
                        .i64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(0))
                        .collect();
                    Some(Series::new(name, values).cast(series.dtype())?)
                }
                DataType::String | DataType::Categorical(_, _) => {
                    Some(fill_string_nulls(&series, "0")?)
                }
                dtype if is_numeric_dtype(dtype) => Some(fill_numeric_nulls(&series, 0.0)?),
                other => {
                    warn!("Cannot zero-fill column '{}' of type {}", col_name, other);
                    None
                }
            }
        };

        let nulls_after = match filled {
            Some(filled) => {
                let remaining = filled.null_count();
                df.replace(col_name, filled)?;
                remaining
            }
            None => nulls_before,
        };

        Ok(FillRecord {
            column: col_name.to_string(),
            pass,
            method: FillMethod::Zero,
            value: Some("0".to_string()),
            nulls_before,
            nulls_after,
        })
    }

    fn series(df: &DataFrame, col_name: &str) -> Result<Series> {
        df.column(col_name)
            .map(|col| col.as_materialized_series().clone())
            .map_err(|_| CleaningError::ColumnNotFound(col_name.to_string()))
    }

    /// Fill numeric nulls with a constant. The column is only rewritten (and
    /// widened to Float64) when it actually has nulls.
    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        series: Series,
        fill_value: f64,
        pass: ImputationPass,
        method: FillMethod,
    ) -> Result<FillRecord> {
        let nulls_before = series.null_count();
        if nulls_before > 0 {
            let filled = fill_numeric_nulls(&series, fill_value)?;
            df.replace(col_name, filled)?;
        }

        Ok(FillRecord {
            column: col_name.to_string(),
            pass,
            method,
            value: Some(format!("{fill_value:?}")),
            nulls_before,
            nulls_after: 0,
        })
    }
}
