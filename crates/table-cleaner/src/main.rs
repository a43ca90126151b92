//! CLI entry point for the table cleaner.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use table_cleaner::{
    CleanerConfig, CleaningReport, ConsoleReporter, LoggingBackend, ReportSection, ReportSink,
    TableCleaner,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Column-type driven cleaning for CSV tables",
    long_about = "Normalizes column names, converts date columns, fills missing values, \
                  removes duplicate rows and prints descriptive statistics.\n\n\
                  EXAMPLES:\n  \
                  # Clean a file and print the diagnostics\n  \
                  table-cleaner -i customers.csv\n\n  \
                  # Write the cleaned table and plot summaries\n  \
                  table-cleaner -i customers.csv -o cleaned.csv --plot\n\n  \
                  # Machine-readable report\n  \
                  table-cleaner -i customers.csv --json | jq .rows_removed"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Write the cleaned table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory of the cleaning log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log file name (without extension)
    #[arg(long, default_value = "data_cleaning")]
    log_name: String,

    /// Describe the exploratory figures after cleaning
    #[arg(long)]
    plot: bool,

    /// Output the cleaning report as JSON to stdout instead of the sections
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Substring marking date columns
    #[arg(long, default_value = "date")]
    date_marker: String,

    /// Substring marking identifier columns
    #[arg(long, default_value = "id")]
    id_marker: String,

    /// Fixed number of histogram bins (Sturges' rule when omitted)
    #[arg(long)]
    bins: Option<usize>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config_builder = CleanerConfig::builder()
        .log_dir(&args.log_dir)
        .log_name(&args.log_name)
        .date_marker(&args.date_marker)
        .id_marker(&args.id_marker);
    if let Some(bins) = args.bins {
        config_builder = config_builder.histogram_bins(bins);
    }
    let config = config_builder.build()?;

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let reporter: Box<dyn ReportSink> = if args.json {
        Box::new(Vec::<ReportSection>::new())
    } else {
        Box::new(ConsoleReporter)
    };

    let mut cleaner = TableCleaner::builder()
        .config(config)
        .reporter(reporter)
        .build(data)?;

    let report = cleaner.clean()?;

    if args.plot {
        let figures = cleaner.plot(&mut LoggingBackend)?;
        debug!("Planned {} figures", figures.len());
    }

    if let Some(ref output) = args.output {
        write_csv(cleaner.data(), output)?;
        info!("Cleaned table written to: {}", output.display());
    }

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_summary(&report, &cleaner);
    Ok(())
}

/// Print a short closing summary after the report sections.
fn print_summary(report: &CleaningReport, cleaner: &TableCleaner) {
    println!();
    println!("{}", "=".repeat(60));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(60));
    println!(
        "Rows: {} -> {} ({} duplicates removed)",
        report.shape.rows, report.final_shape.rows, report.rows_removed
    );
    if !report.renamed_columns.is_empty() {
        println!("Renamed columns: {}", report.renamed_columns.len());
    }
    if !report.date_conversion.converted.is_empty() {
        println!(
            "Date columns: {}",
            report.date_conversion.converted.join(", ")
        );
    }
    if let Some(ref failure) = report.date_conversion.failed {
        println!("  ! {}", failure.reason);
    }
    if let Some(path) = cleaner.log().path() {
        println!("Log: {}", path.display());
    }
    println!("Use --json for machine-readable output");
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut df = df.clone();
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

/// Load CSV with multiple fallback strategies.
///
/// Dates are never parsed here; date columns are detected by name later.
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Read every column as text
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .with_context(|| format!("Could not parse {path} as CSV"))
}
