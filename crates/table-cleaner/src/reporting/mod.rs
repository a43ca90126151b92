//! Cleaning reports.
//!
//! A run produces two views of the same diagnostics:
//! - [`ReportSection`]s, emitted one by one to a
//!   [`ReportSink`](crate::pipeline::ReportSink) while the stages run
//! - a [`CleaningReport`], returned at the end and serializable as JSON
//!   (`--json` CLI flag)

use crate::error::Result;
use crate::profiler::{IqrBounds, NameHeuristics, NumericSummary};
use crate::types::FillRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row and column count of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}

/// A column renamed by name normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedColumn {
    pub from: String,
    pub to: String,
}

/// What happened to the date-candidate columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateConversionOutcome {
    /// Columns converted to datetime, in table order.
    pub converted: Vec<String>,
    /// The column whose conversion failed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<DateConversionFailure>,
    /// Candidates after the failed one, left untouched.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateConversionFailure {
    pub column: String,
    pub reason: String,
}

/// One diagnostic, as printed to the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum ReportSection {
    Shape(TableShape),
    NullPercentages(Vec<(String, f64)>),
    DuplicateCounts(Vec<(String, usize)>),
    NumericStats(Vec<NumericSummary>),
    NumericColumns(Vec<String>),
    IqrValues(Vec<IqrBounds>),
}

impl ReportSection {
    /// Header line printed above the section body.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Shape(_) => "---- Shape ----",
            Self::NullPercentages(_) => "---- Null % ----",
            Self::DuplicateCounts(_) => "---- Duplicate Count ----",
            Self::NumericStats(_) => "---- Stats (Numeric only) ----",
            Self::NumericColumns(_) => "---- Numeric Columns ----",
            Self::IqrValues(_) => "---- IQR Values ----",
        }
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "NaN".to_string(),
    }
}

fn fmt_summaries(f: &mut fmt::Formatter<'_>, summaries: &[NumericSummary]) -> fmt::Result {
    let rows: [(&str, fn(&NumericSummary) -> String); 8] = [
        ("count", |s| format!("{:.6}", s.count as f64)),
        ("mean", |s| fmt_stat(s.mean)),
        ("std", |s| fmt_stat(s.std)),
        ("min", |s| fmt_stat(s.min)),
        ("25%", |s| fmt_stat(s.q25)),
        ("50%", |s| fmt_stat(s.median)),
        ("75%", |s| fmt_stat(s.q75)),
        ("max", |s| fmt_stat(s.max)),
    ];

    let widths: Vec<usize> = summaries
        .iter()
        .map(|s| {
            rows.iter()
                .map(|(_, cell)| cell(s).len())
                .chain(std::iter::once(s.column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    write!(f, "{:<6}", "")?;
    for (summary, width) in summaries.iter().zip(&widths) {
        write!(f, "  {:>width$}", summary.column, width = width)?;
    }
    writeln!(f)?;

    for (label, cell) in rows {
        write!(f, "{label:<6}")?;
        for (summary, width) in summaries.iter().zip(&widths) {
            write!(f, "  {:>width$}", cell(summary), width = width)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        match self {
            Self::Shape(shape) => writeln!(f, "{shape}"),
            Self::NullPercentages(values) => {
                for (column, pct) in values {
                    writeln!(f, "{column}: {pct:.2}%")?;
                }
                Ok(())
            }
            Self::DuplicateCounts(values) => {
                for (column, count) in values {
                    writeln!(f, "{column}: {count}")?;
                }
                Ok(())
            }
            Self::NumericStats(summaries) => fmt_summaries(f, summaries),
            Self::NumericColumns(columns) => writeln!(f, "{columns:?}"),
            Self::IqrValues(bounds) => {
                for b in bounds {
                    writeln!(f)?;
                    writeln!(f, "Column: {}", b.column)?;
                    writeln!(f, "Q1: {}", fmt_stat(b.q1))?;
                    writeln!(f, "Q3: {}", fmt_stat(b.q3))?;
                    writeln!(f, "IQR: {}", fmt_stat(b.iqr))?;
                    writeln!(
                        f,
                        "Fences: [{}, {}] ({} outliers)",
                        fmt_stat(b.lower_fence),
                        fmt_stat(b.upper_fence),
                        b.outlier_count
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Everything a cleaning run found and did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Shape after date conversion, before any row is removed.
    pub shape: TableShape,
    /// Shape of the cleaned table.
    pub final_shape: TableShape,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renamed_columns: Vec<RenamedColumn>,
    pub heuristics: NameHeuristics,
    pub date_conversion: DateConversionOutcome,
    pub null_percentages: Vec<(String, f64)>,
    pub first_pass_fills: Vec<FillRecord>,
    pub duplicate_counts: Vec<(String, usize)>,
    pub rows_removed: usize,
    pub second_pass_fills: Vec<FillRecord>,
    pub numeric_summaries: Vec<NumericSummary>,
    pub numeric_columns: Vec<String>,
    pub iqr: Vec<IqrBounds>,
}

impl CleaningReport {
    /// The console sections in emission order.
    pub fn sections(&self) -> Vec<ReportSection> {
        vec![
            ReportSection::Shape(self.shape),
            ReportSection::NullPercentages(self.null_percentages.clone()),
            ReportSection::DuplicateCounts(self.duplicate_counts.clone()),
            ReportSection::NumericStats(self.numeric_summaries.clone()),
            ReportSection::NumericColumns(self.numeric_columns.clone()),
            ReportSection::IqrValues(self.iqr.clone()),
        ]
    }

    /// IQR entry of a column, if one was reported.
    pub fn iqr_for(&self, column: &str) -> Option<&IqrBounds> {
        self.iqr.iter().find(|b| b.column == column)
    }

    /// First-pass fill record of a column.
    pub fn first_pass_fill(&self, column: &str) -> Option<&FillRecord> {
        self.first_pass_fills.iter().find(|r| r.column == column)
    }

    /// Pretty-printed JSON form of the whole report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
