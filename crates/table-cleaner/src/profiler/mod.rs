//! Table profiling: column classification and name heuristics.
//!
//! This module provides:
//! - Classification of columns by their current dtype
//! - Name-based date/identifier detection
//! - Descriptive statistics and IQR bounds for numeric columns

mod statistics;

pub use statistics::{IqrBounds, NumericSummary, mean, quantile_sorted, sample_std};

use crate::utils::{DtypeCategory, missing_count, names_containing, series_dtype_category};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column sets selected by name, not by content.
///
/// A column lands in a set when its (normalized) name contains the marker as a
/// case-sensitive substring, so `valid` and `guid` are both identifiers under
/// the default `"id"` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameHeuristics {
    pub date_candidates: Vec<String>,
    pub id_columns: Vec<String>,
}

impl NameHeuristics {
    /// Scan the column names of `df`.
    pub fn detect(df: &DataFrame, date_marker: &str, id_marker: &str) -> Self {
        let names = df.get_column_names();
        Self {
            date_candidates: names_containing(names.iter().map(|n| n.as_str()), date_marker),
            id_columns: names_containing(names.iter().map(|n| n.as_str()), id_marker),
        }
    }

    /// Whether the column is excluded from IQR reporting.
    pub fn is_excluded_from_iqr(&self, column: &str) -> bool {
        self.date_candidates.iter().any(|c| c == column)
            || self.id_columns.iter().any(|c| c == column)
    }
}

/// Snapshot of how each column is classified right now.
///
/// Classification follows the dtype only, so it has to be taken again after
/// any stage that changes dtypes (date conversion, imputation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClasses {
    /// Every column in table order, with its category.
    pub columns: Vec<(String, DtypeCategory)>,
}

impl ColumnClasses {
    /// Classify every column of `df`.
    pub fn of(df: &DataFrame) -> Self {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                (series.name().to_string(), series_dtype_category(series))
            })
            .collect();
        Self { columns }
    }

    /// Category of a named column.
    pub fn category(&self, column: &str) -> Option<DtypeCategory> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, category)| *category)
    }

    /// Names of columns in the given category, in table order.
    pub fn names(&self, category: DtypeCategory) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(_, c)| *c == category)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Numeric column names.
    pub fn numeric(&self) -> Vec<String> {
        self.names(DtypeCategory::Numeric)
    }

    /// Categorical (string-like) column names.
    pub fn categorical(&self) -> Vec<String> {
        self.names(DtypeCategory::String)
    }
}

/// Percentage (0-100) of missing values in a Series, counting float NaN as
/// missing. Zero for an empty Series.
pub fn null_percentage(series: &Series) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    missing_count(series) as f64 / series.len() as f64 * 100.0
}
