//! Structural cleaning of a table.
//!
//! This module provides functionality for:
//! - Validating and normalizing column names
//! - Converting date-candidate columns to datetime
//! - Removing duplicate rows

mod converters;

pub(crate) use converters::column_to_datetime;

use crate::error::{CleaningError, Result};
use crate::logging::LogSink;
use crate::reporting::{DateConversionFailure, DateConversionOutcome, RenamedColumn};
use crate::utils::{nan_to_null, normalize_column_name};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Data cleaner for the structural cleaning stages.
pub struct DataCleaner;

impl DataCleaner {
    /// Check that the table can be cleaned at all.
    ///
    /// Rejects a table without columns and a table where two names collapse
    /// onto the same normalized name.
    pub fn validate_column_names(df: &DataFrame) -> Result<()> {
        if df.width() == 0 {
            return Err(CleaningError::EmptyTable);
        }

        let mut seen: HashMap<String, String> = HashMap::with_capacity(df.width());
        for name in df.get_column_names() {
            let normalized = normalize_column_name(name);
            if let Some(first) = seen.get(&normalized) {
                return Err(CleaningError::DuplicateColumnName {
                    first: first.clone(),
                    second: name.to_string(),
                    normalized,
                });
            }
            seen.insert(normalized, name.to_string());
        }
        Ok(())
    }

    /// Rename every column to its normalized form.
    ///
    /// Returns the columns whose name actually changed.
    pub fn normalize_column_names(df: &mut DataFrame) -> Result<Vec<RenamedColumn>> {
        let old_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let new_names: Vec<String> = old_names
            .iter()
            .map(|name| normalize_column_name(name))
            .collect();

        df.set_column_names(new_names.iter().map(String::as_str))?;

        let renamed: Vec<RenamedColumn> = old_names
            .into_iter()
            .zip(new_names)
            .filter(|(from, to)| from != to)
            .map(|(from, to)| RenamedColumn { from, to })
            .collect();

        debug!("Normalized {} column names", renamed.len());
        Ok(renamed)
    }

    /// Convert each date-candidate column to `Datetime(ms)`.
    ///
    /// Unparseable values become null. When a whole column cannot be
    /// converted, an ERROR entry is logged and the remaining candidates are
    /// left as they are; columns converted before it stay converted. Any other
    /// failure is returned.
    pub fn convert_date_columns(
        df: &mut DataFrame,
        candidates: &[String],
        log: &mut LogSink,
    ) -> Result<DateConversionOutcome> {
        let mut outcome = DateConversionOutcome::default();

        for (idx, column) in candidates.iter().enumerate() {
            let series = df
                .column(column)
                .map_err(|_| CleaningError::ColumnNotFound(column.clone()))?
                .as_materialized_series()
                .clone();

            match column_to_datetime(&series) {
                Ok(converted) => {
                    let lost = converted.null_count().saturating_sub(series.null_count());
                    if lost > 0 {
                        debug!("{} values in '{}' could not be parsed", lost, column);
                    }
                    df.replace(column, converted)?;
                    log.info(format!("Converted date(object) to date(date): {column}"))?;
                    outcome.converted.push(column.clone());
                }
                Err(err) if err.is_recoverable() => {
                    warn!("{}", err);
                    log.error("Unable to convert to date column")?;
                    outcome.failed = Some(DateConversionFailure {
                        column: column.clone(),
                        reason: err.to_string(),
                    });
                    outcome.skipped = candidates[idx + 1..].to_vec();
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(outcome)
    }

    /// Replace float NaN with null so it counts as missing downstream.
    ///
    /// Returns the number of values replaced.
    pub fn nan_to_null(df: &mut DataFrame) -> Result<usize> {
        let float_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::Float32 | DataType::Float64))
            .map(|col| col.name().to_string())
            .collect();

        let mut replaced = 0;
        for name in float_columns {
            let series = df.column(&name)?.as_materialized_series().clone();
            let cleaned = nan_to_null(&series)?;
            let count = cleaned.null_count() - series.null_count();
            if count > 0 {
                df.replace(&name, cleaned)?;
                replaced += count;
            }
        }

        if replaced > 0 {
            debug!("Marked {} NaN values as missing", replaced);
        }
        Ok(replaced)
    }

    /// Drop rows that exactly repeat an earlier row.
    ///
    /// The first occurrence is kept and row order is preserved. Nulls compare
    /// equal to each other. Returns the number of rows removed.
    pub fn remove_duplicate_rows(df: &mut DataFrame) -> Result<usize> {
        let before = df.height();
        if before == 0 {
            return Ok(0);
        }

        *df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();

        debug!("Removed {} duplicate rows", removed);
        Ok(removed)
    }
}
