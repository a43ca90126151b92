//! Tabular Data Cleaning Library
//!
//! Column-type driven cleaning and exploratory reporting for tables held in
//! polars `DataFrame`s.
//!
//! # Overview
//!
//! A single [`TableCleaner::clean()`] run performs, in order:
//!
//! 1. **Name normalization**: lowercase, trim, spaces to underscores
//! 2. **Date/ID detection**: by substring of the column name
//! 3. **Date conversion**: date candidates become `Datetime(ms)`
//! 4. **Diagnostics**: shape and null percentages
//! 5. **First imputation pass**: mean (numeric), mode (string), forward-fill (other)
//! 6. **Duplicate handling**: per-column repeat counts, then row de-duplication
//! 7. **Second imputation pass**: median, mode or the typed zero
//! 8. **Statistics**: describe table and IQR fences for numeric columns
//!
//! Every fill, every date conversion and the duplicate removal are written to
//! a [`LogSink`]; the diagnostics go to a [`ReportSink`] as they are computed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use table_cleaner::{FigureRecorder, TableCleaner};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .try_into_reader_with_file_path(Some("customers.csv".into()))?
//!     .finish()?;
//!
//! // Logs to logs/data_cleaning.log and prints every section to stdout
//! let mut cleaner = TableCleaner::new(df)?;
//! let report = cleaner.clean()?;
//!
//! println!("Removed {} duplicate rows", report.rows_removed);
//! for bounds in &report.iqr {
//!     println!("{}: IQR {:?}", bounds.column, bounds.iqr);
//! }
//!
//! // Figures are computed by the library and drawn by a backend
//! let mut recorder = FigureRecorder::default();
//! cleaner.plot(&mut recorder)?;
//! ```
//!
//! # Configuration
//!
//! Use [`CleanerConfig`] to customize the run:
//!
//! ```rust,ignore
//! use table_cleaner::{CleanerConfig, LogSink, TableCleaner};
//!
//! let config = CleanerConfig::builder()
//!     .log_dir("out/logs")      // log file directory
//!     .date_marker("dt")        // columns containing "dt" are dates
//!     .histogram_bins(20)       // fixed bins instead of Sturges' rule
//!     .build()?;
//!
//! let mut cleaner = TableCleaner::builder()
//!     .config(config)
//!     .log_sink(LogSink::memory())
//!     .on_report(|section| eprintln!("{section}"))
//!     .build(df)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod logging;
pub mod pipeline;
pub mod plotting;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DataCleaner;
pub use config::{CleanerConfig, CleanerConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use logging::{LogEntry, LogLevel, LogSink};
pub use pipeline::{
    CleaningExecutor, CleaningStage, ClosureReportSink, ConsoleReporter, OutlierAnalyzer,
    ReportSink, TableCleaner, TableCleanerBuilder,
};
pub use plotting::{
    Figure, FigureRecorder, HistogramBins, LoggingBackend, Panel, PlotBackend, PlotPlanner,
    ScatterPoints,
};
pub use profiler::{ColumnClasses, IqrBounds, NameHeuristics, NumericSummary};
pub use reporting::{
    CleaningReport, DateConversionFailure, DateConversionOutcome, RenamedColumn, ReportSection,
    TableShape,
};
pub use types::{FillMethod, FillRecord, ImputationPass};
pub use utils::{DtypeCategory, get_dtype_category, normalize_column_name};
