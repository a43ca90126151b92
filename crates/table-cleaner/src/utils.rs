//! Helpers shared by the cleaning stages: dtype classification, column-name
//! normalization and small Series transformations.

use polars::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Dtype Classification
// =============================================================================

/// How the cleaning stages treat a column, derived from its dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtypeCategory {
    /// Signed, unsigned and float columns
    Numeric,
    /// Date, Datetime and Time
    Datetime,
    Boolean,
    /// String and Categorical
    String,
    /// Nested, binary, all-null and anything else
    Other,
}

impl DtypeCategory {
    /// Whether the first imputation pass treats this category as "other"
    /// (forward-fill rather than a statistic).
    pub fn is_forward_filled(self) -> bool {
        !matches!(self, Self::Numeric | Self::String)
    }
}

/// True for the integer and float dtypes.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    match dtype {
        dt if is_numeric_dtype(dt) => DtypeCategory::Numeric,
        DataType::Date | DataType::Datetime(_, _) | DataType::Time => DtypeCategory::Datetime,
        DataType::Boolean => DtypeCategory::Boolean,
        DataType::String | DataType::Categorical(_, _) => DtypeCategory::String,
        _ => DtypeCategory::Other,
    }
}

pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// Column Name Utilities
// =============================================================================

/// Normalize a column name: lowercase, trim, spaces to underscores.
///
/// Only the ASCII space is replaced; tabs and other whitespace inside the
/// name are kept.
///
/// # Example
///
/// ```rust,ignore
/// use table_cleaner::utils::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Signup Date "), "signup_date");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().trim().replace(' ', "_")
}

/// Names in `names` that contain `marker` as a case-sensitive substring.
pub fn names_containing<'a, I>(names: I, marker: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| name.contains(marker))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Value Counting
// =============================================================================

/// Most frequent non-null value of a string-like Series.
///
/// Ties are resolved in favour of the lexicographically smallest value, so the
/// result does not depend on row order.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = non_null.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (val, count) in value_counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((val, count));
        }
    }
    best.map(|(val, _)| val.to_string())
}

/// Non-missing values of a numeric Series as `f64`, in row order. NaN is
/// skipped like null.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Count values that repeat a value seen earlier in the same Series.
///
/// Nulls take part like any other value: the second null is a repeat.
pub fn count_repeated_values(series: &Series) -> PolarsResult<usize> {
    Ok(series.len() - series.n_unique()?)
}

/// Missing values of a Series: nulls plus float NaN.
pub fn missing_count(series: &Series) -> usize {
    let nans = match series.dtype() {
        DataType::Float32 | DataType::Float64 => series
            .cast(&DataType::Float64)
            .ok()
            .and_then(|s| {
                s.f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            })
            .unwrap_or(0),
        _ => 0,
    };
    series.null_count() + nans
}

// =============================================================================
// Null Filling
// =============================================================================

/// Turn float NaN into null. Non-float Series come back unchanged.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    let dtype = series.dtype().clone();
    if !matches!(dtype, DataType::Float32 | DataType::Float64) {
        return Ok(series.clone());
    }

    let values: Float64Chunked = series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    values
        .with_name(series.name().clone())
        .into_series()
        .cast(&dtype)
}

/// Replace the nulls of a numeric Series with `fill_value`.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let result_vec: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Replace the nulls of a string-like Series with `fill_value`.
///
/// Categorical input comes back as a plain String column.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let result_vec: Vec<String> = str_series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();

    Ok(Series::new(series.name().clone(), result_vec))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::UInt8), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Datetime(TimeUnit::Milliseconds, None)),
            DtypeCategory::Datetime
        );
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Null), DtypeCategory::Other);
    }

    #[test]
    fn test_forward_filled_categories() {
        assert!(!DtypeCategory::Numeric.is_forward_filled());
        assert!(!DtypeCategory::String.is_forward_filled());
        assert!(DtypeCategory::Datetime.is_forward_filled());
        assert!(DtypeCategory::Boolean.is_forward_filled());
        assert!(DtypeCategory::Other.is_forward_filled());
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Customer ID"), "customer_id");
        assert_eq!(normalize_column_name("  Signup Date  "), "signup_date");
        assert_eq!(normalize_column_name("already_clean"), "already_clean");
        assert_eq!(normalize_column_name("A  B"), "a__b");
    }

    #[test]
    fn test_names_containing_is_substring_match() {
        let names = ["customer_id", "valid", "guid", "status", "ID"];
        let ids = names_containing(names, "id");
        assert_eq!(ids, vec!["customer_id", "valid", "guid"]);
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_prefers_smallest() {
        let series = Series::new("test".into(), &[Some("b"), Some("a"), None, Some("b"), Some("a")]);
        assert_eq!(string_mode(&series), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_all_null() {
        let series = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode(&series), None);
    }

    #[test]
    fn test_numeric_values_skips_nulls() {
        let series = Series::new("x".into(), &[Some(1i64), None, Some(3)]);
        assert_eq!(numeric_values(&series).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_count_repeated_values() {
        let series = Series::new("x".into(), &[Some(1i64), Some(1), None, Some(2), None, Some(1)]);
        // second 1, second null, third 1
        assert_eq!(count_repeated_values(&series).unwrap(), 3);
    }

    #[test]
    fn test_count_repeated_values_zero_signs_equal() {
        let series = Series::new("x".into(), &[0.0f64, -0.0, 1.0]);
        assert_eq!(count_repeated_values(&series).unwrap(), 1);
    }

    #[test]
    fn test_nan_to_null() {
        let series = Series::new("x".into(), &[Some(1.0f64), Some(f64::NAN), None]);
        let cleaned = nan_to_null(&series).unwrap();
        assert_eq!(cleaned.dtype(), &DataType::Float64);
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(missing_count(&series), 2);
    }

    #[test]
    fn test_nan_to_null_keeps_float32_and_ints() {
        let series = Series::new("x".into(), &[Some(f32::NAN), Some(2.0f32)]);
        assert_eq!(nan_to_null(&series).unwrap().dtype(), &DataType::Float32);

        let ints = Series::new("i".into(), &[1i64, 2]);
        assert_eq!(nan_to_null(&ints).unwrap().dtype(), &DataType::Int64);
        assert_eq!(missing_count(&ints), 0);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_string_nulls_keeps_values_verbatim() {
        let series = Series::new("test".into(), &[Some("A"), None, Some("B")]);
        let filled = fill_string_nulls(&series, "Z").unwrap();
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("A"), Some("Z"), Some("B")]);
    }
}
