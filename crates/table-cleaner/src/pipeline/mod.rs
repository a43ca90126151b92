//! Pipeline module.
//!
//! This module provides the cleaning pipeline and related components.

mod builder;
mod executor;
pub mod outliers;
pub mod progress;

pub use builder::{TableCleaner, TableCleanerBuilder};
pub use executor::CleaningExecutor;
pub use outliers::OutlierAnalyzer;
pub use progress::{CleaningStage, ClosureReportSink, ConsoleReporter, ReportSink};
