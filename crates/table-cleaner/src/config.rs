//! Configuration types for the table cleaner.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic cleaner setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the cleaning pipeline.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use table_cleaner::config::CleanerConfig;
///
/// let config = CleanerConfig::builder()
///     .log_dir("logs")
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Directory holding the append-only log file.
    /// Default: "logs"
    pub log_dir: PathBuf,

    /// File stem of the log file (`<log_dir>/<log_name>.log`).
    /// Default: "data_cleaning"
    pub log_name: String,

    /// Substring that marks a column as a date candidate.
    /// Default: "date"
    pub date_marker: String,

    /// Substring that marks a column as an identifier.
    /// Default: "id"
    pub id_marker: String,

    /// Fixed number of histogram bins for plots.
    /// If None, Sturges' rule is used.
    /// Default: None
    pub histogram_bins: Option<usize>,

    /// Number of points sampled along each density curve.
    /// Default: 200
    pub kde_points: usize,

    /// Multiplier applied to the IQR when computing outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_name: "data_cleaning".to_string(),
            date_marker: "date".to_string(),
            id_marker: "id".to_string(),
            histogram_bins: None,
            kde_points: 200,
            iqr_multiplier: 1.5,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Full path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.log_name))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.date_marker.is_empty() {
            return Err(ConfigValidationError::EmptyMarker("date_marker".to_string()));
        }

        if self.id_marker.is_empty() {
            return Err(ConfigValidationError::EmptyMarker("id_marker".to_string()));
        }

        if self.log_name.is_empty()
            || self.log_name.contains(['/', '\\'])
            || matches!(self.log_name.as_str(), "." | "..")
        {
            return Err(ConfigValidationError::InvalidLogName(self.log_name.clone()));
        }

        if self.histogram_bins == Some(0) {
            return Err(ConfigValidationError::InvalidHistogramBins(0));
        }

        if self.kde_points < 2 {
            return Err(ConfigValidationError::InvalidKdePoints(self.kde_points));
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Marker '{0}' must not be empty")]
    EmptyMarker(String),

    #[error("Invalid log name '{0}' (must be a plain, non-empty file stem)")]
    InvalidLogName(String),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),

    #[error("Invalid KDE points: {0} (must be at least 2)")]
    InvalidKdePoints(usize),

    #[error("Invalid IQR multiplier: {0} (must be positive and finite)")]
    InvalidIqrMultiplier(f64),
}

impl From<ConfigValidationError> for crate::error::CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    log_dir: Option<PathBuf>,
    log_name: Option<String>,
    date_marker: Option<String>,
    id_marker: Option<String>,
    histogram_bins: Option<usize>,
    kde_points: Option<usize>,
    iqr_multiplier: Option<f64>,
}

impl CleanerConfigBuilder {
    /// Set the directory for the log file. It is created on first use.
    pub fn log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(path.into());
        self
    }

    /// Set the log file stem (without the `.log` extension).
    pub fn log_name(mut self, name: impl Into<String>) -> Self {
        self.log_name = Some(name.into());
        self
    }

    /// Set the substring that marks date-candidate columns.
    pub fn date_marker(mut self, marker: impl Into<String>) -> Self {
        self.date_marker = Some(marker.into());
        self
    }

    /// Set the substring that marks identifier columns.
    pub fn id_marker(mut self, marker: impl Into<String>) -> Self {
        self.id_marker = Some(marker.into());
        self
    }

    /// Use a fixed number of histogram bins instead of Sturges' rule.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the density curve resolution.
    pub fn kde_points(mut self, points: usize) -> Self {
        self.kde_points = Some(points);
        self
    }

    /// Set the IQR fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let defaults = CleanerConfig::default();
        let config = CleanerConfig {
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
            log_name: self.log_name.unwrap_or(defaults.log_name),
            date_marker: self.date_marker.unwrap_or(defaults.date_marker),
            id_marker: self.id_marker.unwrap_or(defaults.id_marker),
            histogram_bins: self.histogram_bins.or(defaults.histogram_bins),
            kde_points: self.kde_points.unwrap_or(defaults.kde_points),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
        };

        config.validate()?;
        Ok(config)
    }
}
