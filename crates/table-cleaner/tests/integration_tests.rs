//! Integration tests for the table cleaner.
//!
//! These tests verify end-to-end behavior of a cleaning run on small CSV
//! fixtures and in-memory tables.

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use table_cleaner::{
    CleanerConfig, CleaningError, FigureRecorder, FillMethod, LogLevel, LogSink, Panel,
    ReportSection, TableCleaner,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

/// Cleaner with an in-memory log and a silent report sink.
fn quiet_cleaner(df: DataFrame) -> TableCleaner {
    TableCleaner::builder()
        .log_sink(LogSink::memory())
        .reporter(Box::new(Vec::<ReportSection>::new()))
        .build(df)
        .expect("Cleaner should build")
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

fn log_messages(cleaner: &TableCleaner) -> Vec<String> {
    cleaner
        .log()
        .entries()
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

// ============================================================================
// Customer Scenario
// ============================================================================

#[test]
fn test_customer_scenario_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let config = CleanerConfig::builder()
        .log_dir(tmp.path().join("logs"))
        .build()
        .unwrap();

    let mut cleaner = TableCleaner::builder()
        .config(config)
        .reporter(Box::new(Vec::<ReportSection>::new()))
        .build(load_csv("customers.csv"))
        .unwrap();

    let report = cleaner.clean().expect("Cleaning should succeed");
    let df = cleaner.data();

    assert_eq!(
        column_names(df),
        vec!["customer_id", "signup_date", "status", "amount"]
    );
    assert_eq!(report.heuristics.date_candidates, vec!["signup_date"]);
    assert_eq!(report.heuristics.id_columns, vec!["customer_id"]);
    assert_eq!(report.date_conversion.converted, vec!["signup_date"]);

    // shape is taken before duplicate removal
    assert_eq!(report.shape.rows, 6);
    assert_eq!(report.rows_removed, 1);
    assert_eq!(df.height(), 5);
    assert!(df.height() <= report.shape.rows);

    // unparseable dates: leading one survives ffill, then gets the epoch
    let signup = df.column("signup_date").unwrap();
    assert!(matches!(signup.dtype(), DataType::Datetime(_, _)));
    assert_eq!(signup.null_count(), 0);
    let physical = signup.as_materialized_series().to_physical_repr().into_owned();
    assert_eq!(physical.i64().unwrap().get(0), Some(0));
    assert_eq!(
        report.first_pass_fill("signup_date").unwrap().method,
        FillMethod::ForwardFill
    );
    assert_eq!(report.second_pass_fills.len(), 1);
    assert_eq!(report.second_pass_fills[0].column, "signup_date");

    // missing status gets the mode
    let status = df.column("status").unwrap().as_materialized_series().clone();
    assert_eq!(status.null_count(), 0);
    assert_eq!(status.str().unwrap().get(1), Some("active"));

    // identifier columns are excluded from the IQR report
    let iqr_columns: Vec<&str> = report.iqr.iter().map(|b| b.column.as_str()).collect();
    assert_eq!(iqr_columns, vec!["amount"]);
    assert_eq!(report.numeric_columns, vec!["customer_id", "amount"]);

    // log file
    let log_path = tmp.path().join("logs/data_cleaning.log");
    assert_eq!(cleaner.log().path(), Some(log_path.as_path()));
    let content = std::fs::read_to_string(&log_path).unwrap();
    assert!(content.contains(" - INFO - Converted date(object) to date(date): signup_date"));
    assert!(content.contains(" - INFO - Filled null val for: status with: active"));
    assert!(content.contains(" - INFO - Filled null val for: signup_date with: ffill"));
    assert!(content.contains(" - INFO - Removed duplicate values"));
    assert!(!content.contains("ERROR"));
}

#[test]
fn test_no_names_with_uppercase_or_spaces_after_clean() {
    let mut cleaner = quiet_cleaner(load_csv("customers.csv"));
    cleaner.clean().unwrap();

    for name in column_names(cleaner.data()) {
        assert_eq!(name, name.to_lowercase());
        assert_eq!(name, name.trim());
        assert!(!name.contains(' '), "name with space: {name}");
    }
}

// ============================================================================
// Duplicate Rows and IQR
// ============================================================================

#[test]
fn test_duplicate_row_removed_and_iqr_for_all_columns() {
    let mut cleaner = quiet_cleaner(load_csv("numeric.csv"));
    let report = cleaner.clean().unwrap();

    assert_eq!(report.rows_removed, 1);
    assert_eq!(cleaner.data().height(), 2);
    assert_eq!(
        report.duplicate_counts,
        vec![
            ("a".to_string(), 1),
            ("b".to_string(), 1),
            ("c".to_string(), 1)
        ]
    );

    let iqr_columns: Vec<&str> = report.iqr.iter().map(|b| b.column.as_str()).collect();
    assert_eq!(iqr_columns, vec!["a", "b", "c"]);

    let a = report.iqr_for("a").unwrap();
    assert_eq!(a.q1, Some(1.75));
    assert_eq!(a.q3, Some(3.25));
    assert_eq!(a.iqr, Some(1.5));
}

#[test]
fn test_no_whole_row_duplicates_after_clean() {
    let df = df![
        "k" => [1i64, 1, 2, 2, 1],
        "v" => [Some("x"), Some("x"), None, None, Some("y")],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);
    cleaner.clean().unwrap();

    let mut cleaned = cleaner.data().clone();
    let removed = table_cleaner::DataCleaner::remove_duplicate_rows(&mut cleaned).unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn test_signed_zero_rows_are_duplicates() {
    let df = df![
        "amount" => [0.0f64, -0.0, 2.5],
        "label" => ["x", "x", "y"],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    assert_eq!(report.rows_removed, 1);
    assert_eq!(cleaner.data().height(), 2);
}

// ============================================================================
// Imputation Edge Cases
// ============================================================================

#[test]
fn test_all_missing_numeric_column_filled_with_zero() {
    let df = df![
        "score" => [Option::<f64>::None, None, None],
        "name" => ["a", "b", "c"],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    let fill = report.first_pass_fill("score").unwrap();
    assert_eq!(fill.method, FillMethod::Mean);
    assert_eq!(fill.value.as_deref(), Some("0.0"));
    assert_eq!(cleaner.data().column("score").unwrap().null_count(), 0);
    assert!(log_messages(&cleaner).contains(&"Filled null val for: score with: 0.0".to_string()));
}

#[test]
fn test_nan_counts_as_missing() {
    let df = df![
        "score" => [Some(1.0), Some(f64::NAN), None, Some(3.0)],
        "name" => ["a", "b", "c", "d"],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    assert_eq!(report.null_percentages[0], ("score".to_string(), 50.0));
    let fill = report.first_pass_fill("score").unwrap();
    assert_eq!(fill.value.as_deref(), Some("2.0"));
    assert_eq!(fill.nulls_before, 2);

    let score: Vec<Option<f64>> = cleaner
        .data()
        .column("score")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(score, vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0)]);
    assert!(log_messages(&cleaner).contains(&"Filled null val for: score with: 2.0".to_string()));

    let summary = &report.numeric_summaries[0];
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, Some(2.0));
}

#[test]
fn test_numeric_and_string_columns_complete_after_first_pass() {
    let df = df![
        "x" => [Some(1.0), None, Some(3.0), None],
        "label" => [None, Some("b"), Some("b"), Some("a")],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);
    let report = cleaner.clean().unwrap();

    assert!(report.second_pass_fills.is_empty());
    for col in cleaner.data().get_columns() {
        assert_eq!(col.null_count(), 0, "{} has nulls", col.name());
    }
}

// ============================================================================
// Name Heuristics
// ============================================================================

#[test]
fn test_valid_is_treated_as_identifier() {
    let df = df![
        "valid" => [1i64, 2, 3, 4],
        "amount" => [1.0, 2.0, 3.0, 4.0],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    assert_eq!(report.heuristics.id_columns, vec!["valid"]);
    assert!(report.iqr_for("valid").is_none());
    assert!(report.iqr_for("amount").is_some());
}

#[test]
fn test_custom_markers_from_config() {
    let df = df![
        "created_dt" => ["2024-01-01", "2024-01-02"],
        "key_col" => [1i64, 2],
        "amount" => [1.0, 2.0],
    ]
    .unwrap();
    let config = CleanerConfig::builder()
        .date_marker("dt")
        .id_marker("key")
        .build()
        .unwrap();
    let mut cleaner = TableCleaner::builder()
        .config(config)
        .log_sink(LogSink::memory())
        .reporter(Box::new(Vec::<ReportSection>::new()))
        .build(df)
        .unwrap();

    let report = cleaner.clean().unwrap();

    assert_eq!(report.date_conversion.converted, vec!["created_dt"]);
    assert_eq!(report.heuristics.id_columns, vec!["key_col"]);
    assert_eq!(report.iqr.len(), 1);
}

// ============================================================================
// Date Conversion Failures
// ============================================================================

#[test]
fn test_float_date_column_converts_and_later_candidates_follow() {
    let df = df![
        "update_date" => [1.7e9, 1.71e9, 1.72e9],
        "end_date" => ["2024-01-01", "2024-02-01", "2024-03-01"],
        "amount" => [1.0, 2.0, 3.0],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    assert_eq!(report.date_conversion.converted, vec!["update_date", "end_date"]);
    assert!(report.date_conversion.failed.is_none());
    assert!(report.date_conversion.skipped.is_empty());
    for name in ["update_date", "end_date"] {
        assert!(matches!(
            cleaner.data().column(name).unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
    }
    assert_eq!(report.numeric_columns, vec!["amount"]);
    assert!(
        cleaner
            .log()
            .entries()
            .iter()
            .all(|e| e.level == LogLevel::Info)
    );
}

#[test]
fn test_column_level_date_failure_is_logged_and_recovered() {
    let df = df![
        "start_date" => ["2024-01-01", "2024-01-05", "2024-01-09"],
        "flag_date" => [true, false, true],
        "end_date" => ["2024-02-01", "2024-02-05", "2024-02-09"],
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().expect("Date failure must not abort the run");

    assert_eq!(report.date_conversion.converted, vec!["start_date"]);
    assert_eq!(
        report.date_conversion.failed.as_ref().map(|f| f.column.as_str()),
        Some("flag_date")
    );
    assert_eq!(report.date_conversion.skipped, vec!["end_date"]);

    let df = cleaner.data();
    assert!(matches!(
        df.column("start_date").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
    assert_eq!(df.column("end_date").unwrap().dtype(), &DataType::String);

    let errors: Vec<&str> = cleaner
        .log()
        .entries()
        .iter()
        .filter(|e| e.level == LogLevel::Error)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(errors, vec!["Unable to convert to date column"]);
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn test_name_collision_rejected() {
    let df = df![
        "Name" => ["a", "b"],
        "name " => ["c", "d"],
    ]
    .unwrap();

    let result = TableCleaner::builder()
        .log_sink(LogSink::memory())
        .build(df);

    match result {
        Err(CleaningError::DuplicateColumnName { normalized, .. }) => {
            assert_eq!(normalized, "name");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("collision should be rejected"),
    }
}

#[test]
fn test_zero_row_table_does_not_fail() {
    let df = df![
        "Amount" => Vec::<f64>::new(),
        "Event Date" => Vec::<String>::new(),
    ]
    .unwrap();
    let mut cleaner = quiet_cleaner(df);

    let report = cleaner.clean().unwrap();

    assert_eq!(report.shape.rows, 0);
    assert_eq!(report.rows_removed, 0);
    assert_eq!(column_names(cleaner.data()), vec!["amount", "event_date"]);
    assert!(report.null_percentages.iter().all(|(_, pct)| *pct == 0.0));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_cleaning_twice_changes_nothing_more() {
    let mut first = quiet_cleaner(load_csv("customers.csv"));
    first.clean().unwrap();
    let once = first.into_data();

    let mut second = quiet_cleaner(once.clone());
    let report = second.clean().unwrap();

    assert!(report.renamed_columns.is_empty());
    assert_eq!(report.rows_removed, 0);
    assert_eq!(column_names(second.data()), column_names(&once));
    assert_eq!(second.data().height(), once.height());
}

// ============================================================================
// Report Sections
// ============================================================================

#[test]
fn test_report_sections_match_returned_report() {
    let sections = Arc::new(Mutex::new(Vec::new()));
    let sections_clone = sections.clone();

    let mut cleaner = TableCleaner::builder()
        .log_sink(LogSink::memory())
        .on_report(move |section| sections_clone.lock().unwrap().push(section.clone()))
        .build(load_csv("numeric.csv"))
        .unwrap();

    let report = cleaner.clean().unwrap();

    assert_eq!(*sections.lock().unwrap(), report.sections());
}

#[test]
fn test_report_serializes_to_json() {
    let mut cleaner = quiet_cleaner(load_csv("customers.csv"));
    let report = cleaner.clean().unwrap();

    let text = report.to_json().expect("Should serialize");
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["rows_removed"], 1);
    assert_eq!(json["shape"]["rows"], 6);
    assert_eq!(json["first_pass_fills"][2]["method"], "mode");
}

// ============================================================================
// Plotting
// ============================================================================

#[test]
fn test_plot_plan_for_numeric_table() {
    let mut cleaner = quiet_cleaner(load_csv("numeric.csv"));
    cleaner.clean().unwrap();

    let mut recorder = FigureRecorder::default();
    let figures = cleaner.plot(&mut recorder).unwrap();

    let titles: Vec<&str> = figures.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Numerical columns", "Scatter plot numeric column"]);
    assert_eq!(figures[0].cols, 3);
    assert_eq!(figures[1].cols, 2);
    assert!(recorder.shown);
    assert!(
        figures[1]
            .panels
            .iter()
            .all(|p| matches!(p, Panel::Scatter { .. }))
    );
}

#[test]
fn test_plot_plan_for_customer_table() {
    let mut cleaner = quiet_cleaner(load_csv("customers.csv"));
    cleaner.clean().unwrap();

    let figures = cleaner.plot(&mut FigureRecorder::default()).unwrap();

    // two numeric columns and one categorical: no scatter figures
    let titles: Vec<&str> = figures.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Numerical columns", "Categorical columns"]);
    match &figures[1].panels[0] {
        Panel::Histogram {
            column,
            rotate_x_labels,
            ..
        } => {
            assert_eq!(column, "status");
            assert!(rotate_x_labels.is_some());
        }
        other => panic!("unexpected panel: {other:?}"),
    }
}
