//! Tabular Data Preprocessing Library
//!
//! Profiles, cleans and feature-engineers in-memory tabular data so it is
//! ready for model training.
//!
//! # Overview
//!
//! A dataset is an ordered list of rows, each row an ordered map from column
//! name to a dynamically typed [`Value`]. The library provides:
//!
//! - **Data Profiling**: Per-column type inference, statistics and a dataset quality score
//! - **Target Detection**: Name and distribution heuristics that rank target candidates
//! - **Data Cleaning**: Value sanitizing and per-type conversion
//! - **Imputation**: Drop, mean, median, mode, forward fill and interpolation
//! - **Outlier Handling**: Tukey-fence based remove, cap or log transform
//! - **Feature Engineering**: Date parts, pairwise products and ratios
//! - **Encoding and Scaling**: One-hot or label encoding; standard, min-max or robust scaling
//! - **Feature Selection**: Correlation ranking against the target
//! - **Progress Reporting**: Weighted per-stage progress updates
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_prep::{Dataset, Pipeline, PreprocessingOptions, OutlierStrategy};
//! use serde_json::json;
//!
//! let dataset = Dataset::from_json(json!([
//!     {"region": "north", "units": 10, "revenue": 120.0},
//!     {"region": "south", "units": 4, "revenue": 55.5},
//! ]))?;
//!
//! // Option 1: one-shot call with default options
//! let result = tabular_prep::preprocess(&dataset, &PreprocessingOptions::default())?;
//!
//! // Option 2: a reusable pipeline with progress reporting
//! let options = PreprocessingOptions::builder()
//!     .handle_outliers(OutlierStrategy::Remove)
//!     .feature_selection(true)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .options(options)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&dataset)?;
//!
//! println!("Target column: {:?}", result.target_column);
//! ```
//!
//! # Files
//!
//! The [`frame`] module reads CSV (through polars) and JSON into a
//! [`Dataset`] and writes processed rows back out as CSV.

pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod frame;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::{
    ConfigValidationError, MissingValueStrategy, OutlierStrategy, PreprocessingOptions,
    PreprocessingOptionsBuilder,
};
pub use dataset::{Dataset, Row, Value};
pub use error::{PreprocessingError, Result, ResultExt};
pub use features::{
    CategoricalEncoder, CorrelationMatrix, FeatureEngineer, FeatureSelector, NumericScaler,
    correlation_matrix,
};
pub use frame::{dataset_from_dataframe, dataset_to_dataframe, read_dataset, write_csv};
pub use pipeline::{
    ClosureProgressReporter, OutlierHandler, Pipeline, PipelineBuilder, PipelineStage,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use reporting::{ComprehensiveReport, ReportGenerator};
pub use types::{
    ActionType, ColumnProfile, ColumnStatistics, ColumnType, EncodingParams, EncodingStrategy,
    FeatureMetadata, MlReadiness, PreprocessingAction, PreprocessingResult, PreprocessingSummary,
    ScalingParams, ScalingStrategy,
};

/// Profile every column of a dataset.
///
/// Fails with [`PreprocessingError::EmptyInput`] when there are no rows or
/// the first row has no columns.
pub fn extract_feature_metadata(dataset: &Dataset) -> Result<FeatureMetadata> {
    DataProfiler::extract_feature_metadata(dataset)
}

/// Run the full preprocessing pipeline once. The input is not modified.
pub fn preprocess(dataset: &Dataset, options: &PreprocessingOptions) -> Result<PreprocessingResult> {
    Pipeline::builder()
        .options(options.clone())
        .build()?
        .process(dataset)
}

pub use reporting::generate_data_summary;
