//! Main cleaning pipeline module.
//!
//! This module provides the core `TableCleaner` struct and builder for
//! orchestrating a cleaning run.

use crate::cleaner::DataCleaner;
use crate::config::CleanerConfig;
use crate::error::{CleaningError, Result, ResultExt};
use crate::logging::LogSink;
use crate::pipeline::CleaningExecutor;
use crate::pipeline::outliers::OutlierAnalyzer;
use crate::pipeline::progress::{CleaningStage, ClosureReportSink, ConsoleReporter, ReportSink};
use crate::plotting::{Figure, PlotBackend, PlotPlanner};
use crate::profiler::{ColumnClasses, NameHeuristics};
use crate::reporting::{CleaningReport, ReportSection, TableShape};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, error, info};

/// Cleans one table in place.
///
/// Use [`TableCleaner::builder()`] to customize the configuration, the log
/// sink or where the diagnostics go; [`TableCleaner::new()`] uses the defaults.
///
/// # Example
///
/// ```rust,ignore
/// use table_cleaner::{CleanerConfig, LogSink, TableCleaner};
///
/// let mut cleaner = TableCleaner::builder()
///     .config(CleanerConfig::builder().log_dir("out/logs").build()?)
///     .log_sink(LogSink::memory())
///     .on_report(|section| println!("{section}"))
///     .build(df)?;
///
/// let report = cleaner.clean()?;
/// println!("Removed {} duplicate rows", report.rows_removed);
/// let cleaned = cleaner.into_data();
/// ```
pub struct TableCleaner {
    df: DataFrame,
    config: CleanerConfig,
    log: LogSink,
    reporter: Box<dyn ReportSink>,
}

// Ensure TableCleaner is Send (can be moved to a worker thread)
static_assertions::assert_impl_all!(TableCleaner: Send);

impl TableCleaner {
    /// Create a new cleaner builder.
    pub fn builder() -> TableCleanerBuilder {
        TableCleanerBuilder::default()
    }

    /// Cleaner with the default configuration, a file log under `logs/` and
    /// console output.
    pub fn new(df: DataFrame) -> Result<Self> {
        Self::builder().build(df)
    }

    /// Current state of the table.
    pub fn data(&self) -> &DataFrame {
        &self.df
    }

    /// Consume the cleaner and return the table.
    pub fn into_data(self) -> DataFrame {
        self.df
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    /// Run every cleaning stage in order.
    ///
    /// Diagnostics are sent to the report sink as their stage finishes and
    /// collected in the returned [`CleaningReport`]. Stages are not
    /// transactional: on error the table keeps the changes made so far.
    pub fn clean(&mut self) -> Result<CleaningReport> {
        let start_time = Instant::now();
        info!(
            "Starting cleaning run on {} rows x {} columns",
            self.df.height(),
            self.df.width()
        );

        match self.clean_internal() {
            Ok(report) => {
                info!(
                    "Cleaning completed in {:.2?}: {} rows removed",
                    start_time.elapsed(),
                    report.rows_removed
                );
                Ok(report)
            }
            Err(e) => {
                error!("Cleaning error: {}", e);
                Err(e)
            }
        }
    }

    fn enter(&self, stage: CleaningStage) {
        debug!("Step {}: {}...", stage.number(), stage.display_name());
    }

    fn emit(&mut self, section: ReportSection) {
        self.reporter.emit(&section);
    }

    fn clean_internal(&mut self) -> Result<CleaningReport> {
        self.enter(CleaningStage::NormalizeNames);
        let renamed_columns = DataCleaner::normalize_column_names(&mut self.df)
            .context("Failed to normalize column names")?;

        self.enter(CleaningStage::DetectColumns);
        let heuristics =
            NameHeuristics::detect(&self.df, &self.config.date_marker, &self.config.id_marker);
        debug!(
            "Date candidates: {:?}, id columns: {:?}",
            heuristics.date_candidates, heuristics.id_columns
        );

        self.enter(CleaningStage::ConvertDates);
        let date_conversion = DataCleaner::convert_date_columns(
            &mut self.df,
            &heuristics.date_candidates,
            &mut self.log,
        )?;

        self.enter(CleaningStage::Shape);
        let shape = TableShape {
            rows: self.df.height(),
            columns: self.df.width(),
        };
        self.emit(ReportSection::Shape(shape));

        self.enter(CleaningStage::NullReport);
        DataCleaner::nan_to_null(&mut self.df)?;
        let null_percentages = CleaningExecutor::null_percentages(&self.df);
        self.emit(ReportSection::NullPercentages(null_percentages.clone()));

        self.enter(CleaningStage::FirstImputation);
        let first_pass_fills = CleaningExecutor::impute_first_pass(&mut self.df, &mut self.log)
            .context("First imputation pass failed")?;

        self.enter(CleaningStage::DuplicateReport);
        let duplicate_counts = CleaningExecutor::duplicate_counts(&self.df)?;
        self.emit(ReportSection::DuplicateCounts(duplicate_counts.clone()));

        self.enter(CleaningStage::RemoveDuplicates);
        let rows_removed = DataCleaner::remove_duplicate_rows(&mut self.df)
            .context("Failed to remove duplicate rows")?;
        self.log.info("Removed duplicate values")?;

        self.enter(CleaningStage::SecondImputation);
        let second_pass_fills = CleaningExecutor::impute_second_pass(&mut self.df)
            .context("Second imputation pass failed")?;

        self.enter(CleaningStage::Describe);
        let numeric_columns = ColumnClasses::of(&self.df).numeric();
        let numeric_summaries = CleaningExecutor::describe(&self.df, &numeric_columns)?;
        self.emit(ReportSection::NumericStats(numeric_summaries.clone()));

        self.enter(CleaningStage::IqrReport);
        self.emit(ReportSection::NumericColumns(numeric_columns.clone()));
        let iqr = OutlierAnalyzer::iqr_report(
            &self.df,
            &numeric_columns,
            &heuristics,
            self.config.iqr_multiplier,
        )?;
        self.emit(ReportSection::IqrValues(iqr.clone()));

        Ok(CleaningReport {
            shape,
            final_shape: TableShape {
                rows: self.df.height(),
                columns: self.df.width(),
            },
            renamed_columns,
            heuristics,
            date_conversion,
            null_percentages,
            first_pass_fills,
            duplicate_counts,
            rows_removed,
            second_pass_fills,
            numeric_summaries,
            numeric_columns,
            iqr,
        })
    }

    /// Plan the exploratory figures, hand each to `backend`, then call
    /// `backend.show()`.
    ///
    /// Returns the planned figures. Fails only when the backend does.
    pub fn plot(&self, backend: &mut dyn PlotBackend) -> Result<Vec<Figure>> {
        let figures = PlotPlanner::new(&self.config).plan(&self.df)?;
        for figure in &figures {
            info!("{}", figure.title);
            backend
                .render(figure)
                .map_err(|e| CleaningError::Plot(format!("{}: {}", figure.title, e)))?;
        }
        backend
            .show()
            .map_err(|e| CleaningError::Plot(e.to_string()))?;
        Ok(figures)
    }
}

/// Builder for creating a [`TableCleaner`] instance.
///
/// Use [`TableCleaner::builder()`] to get started.
#[derive(Default)]
pub struct TableCleanerBuilder {
    config: Option<CleanerConfig>,
    log: Option<LogSink>,
    reporter: Option<Box<dyn ReportSink>>,
}

static_assertions::assert_impl_all!(TableCleanerBuilder: Send);

impl TableCleanerBuilder {
    /// Set the cleaner configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the log sink. Defaults to the file named by the configuration.
    pub fn log_sink(mut self, log: LogSink) -> Self {
        self.log = Some(log);
        self
    }

    /// Set where diagnostic sections go. Defaults to stdout.
    pub fn reporter(mut self, reporter: Box<dyn ReportSink>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Set a report callback closure.
    ///
    /// This is a convenience method for simple report handling.
    /// For more complex scenarios, use [`reporter`](Self::reporter).
    pub fn on_report<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ReportSection) + Send + 'static,
    {
        self.reporter = Some(Box::new(ClosureReportSink::new(callback)));
        self
    }

    /// Build the cleaner for `df`.
    ///
    /// Returns an error if the configuration is invalid, the table has no
    /// columns, two column names collapse onto the same normalized name, or
    /// the log file cannot be opened.
    pub fn build(self, df: DataFrame) -> Result<TableCleaner> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        DataCleaner::validate_column_names(&df)?;

        let log = match self.log {
            Some(log) => log,
            None => LogSink::open(&config.log_dir, &config.log_name)?,
        };

        Ok(TableCleaner {
            df,
            config,
            log,
            reporter: self.reporter.unwrap_or_else(|| Box::new(ConsoleReporter)),
        })
    }
}
