//! Date conversion for date-candidate columns.

use crate::error::{CleaningError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Target dtype of every converted column.
pub(crate) fn datetime_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Shape of a date string and the chrono formats tried for it, in order.
struct DatePattern {
    shape: Regex,
    formats: &'static [&'static str],
    has_time: bool,
}

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern {
            shape: Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
            formats: &["%Y-%m-%d"],
            has_time: false,
        },
        DatePattern {
            shape: Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").expect("Invalid regex: YYYY/MM/DD"),
            formats: &["%Y/%m/%d"],
            has_time: false,
        },
        DatePattern {
            shape: Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?$")
                .expect("Invalid regex: datetime"),
            formats: &[
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M",
            ],
            has_time: true,
        },
        // month first, day first only when the month would be out of range
        DatePattern {
            shape: Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("Invalid regex: MM/DD/YYYY"),
            formats: &["%m/%d/%Y", "%d/%m/%Y"],
            has_time: false,
        },
        DatePattern {
            shape: Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
            formats: &["%m-%d-%Y", "%d-%m-%Y"],
            has_time: false,
        },
        DatePattern {
            shape: Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("Invalid regex: DD.MM.YYYY"),
            formats: &["%d.%m.%Y"],
            has_time: false,
        },
        DatePattern {
            shape: Regex::new(r"^[A-Za-z]{3,9} \d{1,2},? \d{4}$").expect("Invalid regex: Mon DD, YYYY"),
            formats: &["%b %d, %Y", "%B %d, %Y", "%b %d %Y", "%B %d %Y"],
            has_time: false,
        },
    ]
});

/// Parse a single date or timestamp string.
///
/// Returns `None` for anything that does not look like a date; offsets are
/// converted to UTC and dropped.
pub(crate) fn parse_datetime_str(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_utc());
    }

    for pattern in DATE_PATTERNS.iter().filter(|p| p.shape.is_match(trimmed)) {
        for format in pattern.formats {
            let parsed = if pattern.has_time {
                NaiveDateTime::parse_from_str(trimmed, format).ok()
            } else {
                NaiveDate::parse_from_str(trimmed, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            };
            if parsed.is_some() {
                return parsed;
            }
        }
    }

    None
}

/// Interpret an integer as a Unix timestamp in milliseconds.
///
/// Values in the typical range of seconds (1e9..2e9) are scaled up, values in
/// the range of milliseconds (1e12..2e12) are kept, anything else is null.
pub(crate) fn epoch_to_millis(value: i64) -> Option<i64> {
    if (1_000_000_000..2_000_000_000).contains(&value) {
        Some(value * 1000)
    } else if (1_000_000_000_000..2_000_000_000_000).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Convert a whole column to `Datetime(ms)`.
///
/// Values that cannot be parsed become null. A column whose dtype cannot hold
/// dates at all is rejected with [`CleaningError::DateConversion`]; polars
/// failures along the way are returned unchanged.
pub(crate) fn column_to_datetime(series: &Series) -> Result<Series> {
    let name = series.name().clone();

    let millis: Vec<Option<i64>> = match series.dtype() {
        DataType::String | DataType::Categorical(_, _) => {
            let str_series = series.cast(&DataType::String)?;
            str_series
                .str()?
                .into_iter()
                .map(|opt| {
                    opt.and_then(parse_datetime_str)
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .collect()
        }
        DataType::Date | DataType::Datetime(_, _) => {
            return Ok(series.cast(&datetime_dtype())?);
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let int_series = series.cast(&DataType::Int64)?;
            int_series
                .i64()?
                .into_iter()
                .map(|opt| opt.and_then(epoch_to_millis))
                .collect()
        }
        // fractional epochs are truncated to whole seconds or milliseconds
        DataType::Float32 | DataType::Float64 => {
            let float_series = series.cast(&DataType::Float64)?;
            float_series
                .f64()?
                .into_iter()
                .map(|opt| {
                    opt.filter(|v| v.is_finite())
                        .and_then(|v| epoch_to_millis(v.trunc() as i64))
                })
                .collect()
        }
        DataType::Null => vec![None; series.len()],
        other => {
            return Err(CleaningError::DateConversion {
                column: name.to_string(),
                reason: format!("dtype {other} cannot hold dates"),
            });
        }
    };

    Ok(Series::new(name, millis).cast(&datetime_dtype())?)
}
