//! Stage tracking and report delivery for the cleaning pipeline.
//!
//! Diagnostics are pushed to a [`ReportSink`] as soon as their stage finishes,
//! so a console user sees them in order while the run continues.
//!
//! # Example
//!
//! ```rust,ignore
//! use table_cleaner::TableCleaner;
//!
//! let mut cleaner = TableCleaner::builder()
//!     .on_report(|section| eprintln!("{}", section.title()))
//!     .build(df)?;
//! cleaner.clean()?;
//! ```

use crate::reporting::ReportSection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of a cleaning run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Lowercase, trim and underscore the column names
    NormalizeNames,
    /// Pick date-candidate and identifier columns by name
    DetectColumns,
    /// Parse date-candidate columns to datetime
    ConvertDates,
    /// Report the table shape
    Shape,
    /// Report the share of nulls per column
    NullReport,
    /// Mean / mode / forward-fill imputation
    FirstImputation,
    /// Report repeated values per column
    DuplicateReport,
    /// Drop rows that repeat an earlier row
    RemoveDuplicates,
    /// Median / mode / zero imputation
    SecondImputation,
    /// Descriptive statistics of numeric columns
    Describe,
    /// Quartiles and fences of numeric columns
    IqrReport,
}

impl CleaningStage {
    /// All stages in execution order.
    pub const ALL: [CleaningStage; 11] = [
        Self::NormalizeNames,
        Self::DetectColumns,
        Self::ConvertDates,
        Self::Shape,
        Self::NullReport,
        Self::FirstImputation,
        Self::DuplicateReport,
        Self::RemoveDuplicates,
        Self::SecondImputation,
        Self::Describe,
        Self::IqrReport,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NormalizeNames => "Normalizing Column Names",
            Self::DetectColumns => "Detecting Date/ID Columns",
            Self::ConvertDates => "Converting Dates",
            Self::Shape => "Reporting Shape",
            Self::NullReport => "Reporting Nulls",
            Self::FirstImputation => "Imputing Values",
            Self::DuplicateReport => "Counting Duplicates",
            Self::RemoveDuplicates => "Removing Duplicate Rows",
            Self::SecondImputation => "Imputing Remaining Values",
            Self::Describe => "Describing Numeric Columns",
            Self::IqrReport => "Computing IQR",
        }
    }

    /// 1-based position of the stage in a run.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|stage| stage == self)
            .map_or(0, |idx| idx + 1)
    }
}

impl fmt::Display for CleaningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Receiver of diagnostic sections during a cleaning run.
///
/// Implementations must be `Send` so the cleaner that owns them can be moved
/// to a worker thread.
///
/// # Example
///
/// ```rust,ignore
/// use table_cleaner::{ReportSection, ReportSink};
///
/// struct TitlesOnly;
///
/// impl ReportSink for TitlesOnly {
///     fn emit(&mut self, section: &ReportSection) {
///         println!("{}", section.title());
///     }
/// }
/// ```
pub trait ReportSink: Send {
    /// Called once per diagnostic, in stage order.
    fn emit(&mut self, section: &ReportSection);
}

/// Prints every section to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ReportSink for ConsoleReporter {
    fn emit(&mut self, section: &ReportSection) {
        println!("\n{section}");
    }
}

/// Collects sections in memory.
impl ReportSink for Vec<ReportSection> {
    fn emit(&mut self, section: &ReportSection) {
        self.push(section.clone());
    }
}

/// Wrapper that implements [`ReportSink`] using a closure.
pub struct ClosureReportSink<F>
where
    F: FnMut(&ReportSection) + Send,
{
    callback: F,
}

impl<F> ClosureReportSink<F>
where
    F: FnMut(&ReportSection) + Send,
{
    /// Creates a new closure-based report sink.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ReportSink for ClosureReportSink<F>
where
    F: FnMut(&ReportSection) + Send,
{
    fn emit(&mut self, section: &ReportSection) {
        (self.callback)(section);
    }
}

static_assertions::assert_impl_all!(ConsoleReporter: Send, Sync);
static_assertions::assert_impl_all!(CleaningStage: Send, Sync);
