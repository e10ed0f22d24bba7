//! CLI entry point for the tabular preprocessing pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tabular_prep::{
    ComprehensiveReport, Dataset, EncodingStrategy, MissingValueStrategy, OutlierStrategy,
    Pipeline, PreprocessingOptions, ReportGenerator, extract_feature_metadata,
    generate_data_summary, read_dataset,
};
use tracing::{error, info};

/// CLI-compatible missing value strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingStrategy {
    /// Drop rows with missing values
    Drop,
    /// Use the mean of non-null values
    Mean,
    /// Use the median of non-null values
    Median,
    /// Use the most frequent value
    Mode,
    /// Carry the previous value forward
    ForwardFill,
    /// Average the neighbouring values
    Interpolate,
}

impl From<CliMissingStrategy> for MissingValueStrategy {
    fn from(cli: CliMissingStrategy) -> Self {
        match cli {
            CliMissingStrategy::Drop => MissingValueStrategy::Drop,
            CliMissingStrategy::Mean => MissingValueStrategy::Mean,
            CliMissingStrategy::Median => MissingValueStrategy::Median,
            CliMissingStrategy::Mode => MissingValueStrategy::Mode,
            CliMissingStrategy::ForwardFill => MissingValueStrategy::ForwardFill,
            CliMissingStrategy::Interpolate => MissingValueStrategy::Interpolate,
        }
    }
}

/// CLI-compatible outlier strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierStrategy {
    /// Cap outliers at IQR bounds
    Cap,
    /// Remove rows containing outliers
    Remove,
    /// Log-transform skewed columns
    Transform,
    /// Keep outliers as-is
    Ignore,
}

impl From<CliOutlierStrategy> for OutlierStrategy {
    fn from(cli: CliOutlierStrategy) -> Self {
        match cli {
            CliOutlierStrategy::Cap => OutlierStrategy::Cap,
            CliOutlierStrategy::Remove => OutlierStrategy::Remove,
            CliOutlierStrategy::Transform => OutlierStrategy::Transform,
            CliOutlierStrategy::Ignore => OutlierStrategy::Ignore,
        }
    }
}

/// CLI-compatible categorical encoding enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEncoding {
    /// One 0/1 column per category
    OneHot,
    /// Integer codes in first-seen order
    Label,
    /// Leave categorical columns untouched
    None,
}

impl From<CliEncoding> for EncodingStrategy {
    fn from(cli: CliEncoding) -> Self {
        match cli {
            CliEncoding::OneHot => EncodingStrategy::OneHot,
            CliEncoding::Label => EncodingStrategy::Label,
            CliEncoding::None => EncodingStrategy::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Tabular data preprocessing pipeline",
    long_about = "Profiles, cleans and feature-engineers a CSV or JSON dataset for machine learning.\n\n\
                  EXAMPLES:\n  \
                  # Basic usage with auto-detection\n  \
                  tabular-prep -i data.csv\n\n  \
                  # Specify target column and output\n  \
                  tabular-prep -i data.csv --target price -o results/\n\n  \
                  # Dry run to print the data summary\n  \
                  tabular-prep -i data.csv --dry-run\n\n  \
                  # Keep the 10 features most correlated with the target\n  \
                  tabular-prep -i data.csv --select-features --max-features 10"
)]
struct Args {
    /// Path to the CSV or JSON file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "<input_name>_processed"
    #[arg(long)]
    output_name: Option<String>,

    /// Target column for ML prediction
    ///
    /// If not specified, the pipeline will auto-detect the target
    #[arg(short, long)]
    target: Option<String>,

    /// Disable target auto-detection
    #[arg(long)]
    no_auto_target: bool,

    /// Strategy for missing values
    #[arg(long, value_enum, default_value = "mean")]
    missing: CliMissingStrategy,

    /// Strategy for handling outliers
    #[arg(long, value_enum, default_value = "cap")]
    outliers: CliOutlierStrategy,

    /// Force one encoding for every categorical column
    #[arg(long, value_enum)]
    encoding: Option<CliEncoding>,

    /// Disable categorical encoding
    #[arg(long)]
    no_encode: bool,

    /// Disable numeric scaling
    #[arg(long)]
    no_scale: bool,

    /// Keep only the features most correlated with the target
    #[arg(long)]
    select_features: bool,

    /// Number of features to keep with --select-features
    #[arg(long)]
    max_features: Option<usize>,

    /// Read at most this many rows
    #[arg(long, default_value = "10000")]
    max_rows: usize,

    /// Print the data summary without processing
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
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
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let dataset = read_dataset(&args.input, Some(args.max_rows))?;
    info!(
        "Dataset loaded successfully: {} rows x {} columns",
        dataset.len(),
        dataset.all_columns().len()
    );

    if args.dry_run {
        return run_dry_run(&dataset);
    }

    let options = build_options(&args)?;
    let pipeline = build_pipeline(&args, options)?;

    run_pipeline(&pipeline, &args, &dataset)
}

/// Translate CLI flags into pipeline options.
fn build_options(args: &Args) -> Result<PreprocessingOptions> {
    let mut builder = PreprocessingOptions::builder()
        .auto_detect_target(!args.no_auto_target)
        .handle_missing(args.missing.into())
        .handle_outliers(args.outliers.into())
        .encode_categorical(!args.no_encode)
        .scale_numeric(!args.no_scale)
        .feature_selection(args.select_features);

    if let Some(ref target) = args.target {
        builder = builder.target_column(target);
    }
    if let Some(n) = args.max_features {
        builder = builder.max_features(n);
    }
    if let Some(encoding) = args.encoding {
        builder = builder.categorical_encoding(encoding.into());
    }

    Ok(builder.build()?)
}

fn build_pipeline(args: &Args, options: PreprocessingOptions) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().options(options);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Print the data summary without processing.
///
/// Uses `println!` on purpose: the summary is the output of `--dry-run` and
/// must show regardless of the log level.
fn run_dry_run(dataset: &Dataset) -> Result<()> {
    let metadata = extract_feature_metadata(dataset)?;

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Dataset profile");
    println!("{}\n", "=".repeat(80));
    print!("{}", generate_data_summary(dataset, &metadata));
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Run pipeline, write the processed dataset and print results
fn run_pipeline(pipeline: &Pipeline, args: &Args, dataset: &Dataset) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting preprocessing pipeline...");
    info!("{}", "=".repeat(80));

    let result = pipeline.process(dataset).map_err(|e| {
        error!("Pipeline failed: {}", e);
        anyhow!("Pipeline failed: {}", e)
    })?;

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(PathBuf::from(&args.output), args.output_name.clone());
    let output_path = generator.write_dataset(&result.processed_data, &input_stem)?;
    let output_file = output_path.display().to_string();

    let report =
        ReportGenerator::build_comprehensive_report(&args.input, Some(&output_file), &result);

    // Handle JSON output to stdout
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable summary of the preprocessing results.
fn print_human_readable_summary(report: &ComprehensiveReport) {
    let summary = &report.processing_summary;
    let quality = &report.quality_assessment;

    println!();
    println!("{}", "=".repeat(80));
    println!("PREPROCESSING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows_before, summary.columns_before
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_after, summary.columns_after
        );
    }
    println!();

    if let Some(ref target) = report.target_column {
        println!("Target Column: {}", target);
    }
    println!(
        "Data Quality: {:.1}/100 ({})",
        quality.data_quality_score,
        quality.ml_readiness.display_name()
    );
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed)",
        summary.rows_before, summary.rows_after, summary.rows_removed
    );
    println!(
        "  Columns: {} -> {} ({} added, {} removed)",
        summary.columns_before, summary.columns_after, summary.columns_added, summary.columns_removed
    );
    println!();

    let steps: Vec<&String> = report
        .cleaning_steps
        .iter()
        .chain(&report.transformations_applied)
        .chain(&report.feature_engineering_steps)
        .collect();
    if !steps.is_empty() {
        println!("Actions Taken:");
        for step in steps.iter().take(10) {
            println!("  - {}", step);
        }
        if steps.len() > 10 {
            println!("  ... and {} more actions", steps.len() - 10);
        }
        println!();
    }

    if let Some(ref importance) = report.feature_importance {
        println!("Selected Features:");
        for (name, score) in importance.iter().take(10) {
            println!("  {:<30} {:.3}", name, score);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    if !summary.errors.is_empty() {
        println!("Errors:");
        for err in &summary.errors {
            println!("  x {}", err);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
