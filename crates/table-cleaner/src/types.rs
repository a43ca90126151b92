//! Shared types recorded while cleaning a table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two imputation passes produced a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationPass {
    /// Type-driven pass right after the null report (mean / mode / ffill).
    First,
    /// Safety-net pass after duplicate removal (median / mode / zero).
    Second,
}

/// How missing values in a column were filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    Mean,
    Median,
    Mode,
    ForwardFill,
    Zero,
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::ForwardFill => "ffill",
            Self::Zero => "zero",
        };
        f.write_str(name)
    }
}

/// One fill action applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRecord {
    pub column: String,
    pub pass: ImputationPass,
    pub method: FillMethod,
    /// The constant written into the gaps, rendered as text.
    /// `None` for forward-fill, which has no single value.
    pub value: Option<String>,
    /// Nulls present before the fill.
    pub nulls_before: usize,
    /// Nulls left after the fill (only forward-fill can leave some).
    pub nulls_after: usize,
}

impl FillRecord {
    /// Text used in the log line: the fill value, or `ffill`.
    pub fn value_label(&self) -> String {
        match &self.value {
            Some(value) => value.clone(),
            None => self.method.to_string(),
        }
    }

    /// Number of cells actually filled.
    pub fn filled(&self) -> usize {
        self.nulls_before.saturating_sub(self.nulls_after)
    }
}
