//! Cleaning executor module.
//!
//! Contains the per-column diagnostics and both imputation passes.

use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::logging::LogSink;
use crate::profiler::{ColumnClasses, NumericSummary, null_percentage};
use crate::types::{FillRecord, ImputationPass};
use crate::utils::{DtypeCategory, count_repeated_values};
use polars::prelude::*;
use tracing::debug;

/// Executes the column-wise stages of a cleaning run.
pub struct CleaningExecutor;

impl CleaningExecutor {
    /// Null share (0-100) of every column, in table order.
    pub fn null_percentages(df: &DataFrame) -> Vec<(String, f64)> {
        df.get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                (series.name().to_string(), null_percentage(series))
            })
            .collect()
    }

    /// First imputation pass, driven by each column's current dtype.
    ///
    /// Numeric columns get their mean, string columns their mode and every
    /// other column is forward-filled. Each column gets a log entry, with or
    /// without nulls.
    pub fn impute_first_pass(df: &mut DataFrame, log: &mut LogSink) -> Result<Vec<FillRecord>> {
        let classes = ColumnClasses::of(df);
        let mut records = Vec::with_capacity(classes.columns.len());

        for (col_name, category) in &classes.columns {
            let record = match category {
                c if c.is_forward_filled() => {
                    StatisticalImputer::apply_forward_fill(df, col_name, ImputationPass::First)?
                }
                DtypeCategory::Numeric => {
                    StatisticalImputer::apply_numeric_mean(df, col_name, ImputationPass::First)?
                }
                _ => StatisticalImputer::apply_mode_imputation(df, col_name, ImputationPass::First)?,
            };

            log.info(format!(
                "Filled null val for: {} with: {}",
                col_name,
                record.value_label()
            ))?;
            records.push(record);
        }

        Ok(records)
    }

    /// Repeated-value count of every column, in table order.
    pub fn duplicate_counts(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        df.get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                Ok((series.name().to_string(), count_repeated_values(series)?))
            })
            .collect()
    }

    /// Second imputation pass over every column that still has nulls.
    ///
    /// String columns get their mode, numeric columns their median and
    /// anything else the zero of its own type.
    pub fn impute_second_pass(df: &mut DataFrame) -> Result<Vec<FillRecord>> {
        let classes = ColumnClasses::of(df);
        let mut records = Vec::new();

        for (col_name, category) in &classes.columns {
            let has_nulls = df
                .column(col_name)
                .map(|col| col.null_count() > 0)
                .unwrap_or(false);
            if !has_nulls {
                continue;
            }

            let record = match category {
                DtypeCategory::String => {
                    StatisticalImputer::apply_mode_imputation(df, col_name, ImputationPass::Second)?
                }
                DtypeCategory::Numeric => {
                    StatisticalImputer::apply_numeric_median(df, col_name, ImputationPass::Second)?
                }
                _ => StatisticalImputer::apply_zero_fill(df, col_name, ImputationPass::Second)?,
            };

            debug!(
                "Second pass filled {} nulls in {} with {}",
                record.filled(),
                col_name,
                record.method
            );
            records.push(record);
        }

        Ok(records)
    }

    /// Descriptive statistics of the numeric columns.
    pub fn describe(df: &DataFrame, numeric_columns: &[String]) -> Result<Vec<NumericSummary>> {
        let mut summaries = Vec::with_capacity(numeric_columns.len());
        for col_name in numeric_columns {
            let series = df.column(col_name)?.as_materialized_series();
            summaries.push(NumericSummary::from_series(series)?);
        }
        Ok(summaries)
    }
}
