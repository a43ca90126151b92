//! Custom error types for the table cleaner.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable so they can be embedded in JSON output next to a report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The table has no columns.
    #[error("Table has no columns")]
    EmptyTable,

    /// Two column names collapse to the same name after normalization.
    #[error("Columns '{first}' and '{second}' both normalize to '{normalized}'")]
    DuplicateColumnName {
        first: String,
        second: String,
        normalized: String,
    },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A date-candidate column cannot be interpreted as dates at all.
    ///
    /// Individual unparseable values never produce this error; they become null.
    #[error("Failed to convert column '{column}' to datetime: {reason}")]
    DateConversion { column: String, reason: String },

    /// The plotting backend rejected a figure.
    #[error("Plot rendering failed: {0}")]
    Plot(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message wording.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTable => "EMPTY_TABLE",
            Self::DuplicateColumnName { .. } => "DUPLICATE_COLUMN_NAME",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::DateConversion { .. } => "DATE_CONVERSION_FAILED",
            Self::Plot(_) => "PLOT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the pipeline can continue past this error.
    ///
    /// Only column-level date conversion failures are absorbed by `clean()`;
    /// everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::DateConversion { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
