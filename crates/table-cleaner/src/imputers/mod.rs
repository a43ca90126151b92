//! Imputation of missing values.
//!
//! Both cleaning passes fill column by column with [`StatisticalImputer`]:
//! - mean / mode / forward-fill in the first pass
//! - median / mode / typed zero in the second pass

mod statistical;

pub use statistical::{EMPTY_MODE_FALLBACK, EMPTY_NUMERIC_FALLBACK, StatisticalImputer};
