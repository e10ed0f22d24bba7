use crate::dataset::Dataset;
use crate::frame::write_csv;
use crate::types::{
    EncodingParams, FeatureMetadata, MlReadiness, PreprocessingAction, PreprocessingResult,
    ScalingParams,
};
use anyhow::Result;
use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Null percentage above which a column is listed as mostly empty.
const HIGH_NULL_PERCENT: f64 = 50.0;

// ============================================================================
// Comprehensive Report Types
// ============================================================================

/// Comprehensive report merging all report data for CLI and library output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,

    pub processing_summary: ProcessingSummaryReport,
    pub quality_assessment: QualityReport,

    pub cleaning_steps: Vec<String>,
    pub transformations_applied: Vec<String>,
    pub feature_engineering_steps: Vec<String>,
    pub actions: Vec<PreprocessingAction>,

    pub target_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<IndexMap<String, f64>>,
    pub scaling_params: Vec<ScalingParams>,
    pub encoding_params: Vec<EncodingParams>,

    pub dataset_profile: DatasetProfileSummary,
}

/// Summary of processing for the comprehensive report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummaryReport {
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub rows_removed_percent: f64,
    pub columns_before: usize,
    pub columns_after: usize,
    pub columns_added: usize,
    pub columns_removed: usize,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Quality metrics of the input, as profiled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub data_quality_score: f64,
    pub ml_readiness: MlReadiness,
    /// Numeric columns with at least one value outside the Tukey fences
    pub outlier_columns: Vec<String>,
    /// Columns with more than half of their values missing
    pub high_null_columns: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Dataset profile summary for the comprehensive report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfileSummary {
    /// Original shape (rows, columns)
    pub original_shape: (usize, usize),
    /// Final shape after processing
    pub final_shape: (usize, usize),
    /// Count of columns by inferred type
    pub type_counts: IndexMap<String, usize>,
    /// Percentage breakdown by type
    pub type_percentages: IndexMap<String, String>,
    /// Target candidates, best first, with scores
    pub target_candidates: Vec<(String, f64)>,
}

impl QualityReport {
    pub fn from_metadata(metadata: &FeatureMetadata) -> Self {
        let outlier_columns = metadata
            .column_profiles
            .values()
            .filter(|p| p.numeric_stats().is_some_and(|s| s.outlier_count > 0))
            .map(|p| p.name.clone())
            .collect();

        let high_null_columns = metadata
            .column_profiles
            .values()
            .filter(|p| p.null_percentage > HIGH_NULL_PERCENT)
            .map(|p| p.name.clone())
            .collect();

        Self {
            data_quality_score: metadata.data_quality_score,
            ml_readiness: metadata.ml_readiness,
            outlier_columns,
            high_null_columns,
            recommendations: metadata.preprocessing_recommendations.clone(),
        }
    }
}

impl DatasetProfileSummary {
    pub fn from_metadata(metadata: &FeatureMetadata, final_shape: (usize, usize)) -> Self {
        let mut type_counts: IndexMap<String, usize> = IndexMap::new();
        for profile in metadata.column_profiles.values() {
            *type_counts
                .entry(profile.column_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let total = metadata.column_profiles.len().max(1) as f64;
        let type_percentages = type_counts
            .iter()
            .map(|(k, v)| (k.clone(), format!("{:.1}", *v as f64 / total * 100.0)))
            .collect();

        let target_candidates = metadata
            .target_candidates()
            .into_iter()
            .map(|p| (p.name.clone(), p.target_score))
            .collect();

        Self {
            original_shape: (metadata.total_rows, metadata.total_columns),
            final_shape,
            type_counts,
            type_percentages,
            target_candidates,
        }
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes processed datasets and JSON reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    /// Path the processed dataset is written to for a given input stem.
    pub fn dataset_path(&self, input_stem: &str) -> PathBuf {
        let name = self
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{}_processed", input_stem));
        self.output_dir.join(format!("{}.csv", name))
    }

    /// Save the processed dataset as CSV.
    pub fn write_dataset(&self, dataset: &Dataset, input_stem: &str) -> Result<PathBuf> {
        let path = self.dataset_path(input_stem);
        write_csv(dataset, &path)?;
        Ok(path)
    }

    /// Build a comprehensive report from pipeline results.
    ///
    /// This method creates a single, unified report structure that can be:
    /// - Serialized to JSON and printed to stdout (`--json`)
    /// - Written to a file (`--emit-report`)
    /// - Used programmatically in library mode
    pub fn build_comprehensive_report(
        input_file: &str,
        output_file: Option<&str>,
        result: &PreprocessingResult,
    ) -> ComprehensiveReport {
        let summary = &result.summary;
        let metadata = &result.feature_metadata;

        let processing_summary = ProcessingSummaryReport {
            duration_ms: summary.duration_ms,
            rows_before: summary.rows_before,
            rows_after: summary.rows_after,
            rows_removed: summary.rows_removed,
            rows_removed_percent: summary.rows_removed_percentage(),
            columns_before: summary.columns_before,
            columns_after: summary.columns_after,
            columns_added: summary.columns_added,
            columns_removed: summary.columns_removed,
            warnings: result.warnings.clone(),
            errors: result.errors.clone(),
        };

        ComprehensiveReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            processing_summary,
            quality_assessment: QualityReport::from_metadata(metadata),
            cleaning_steps: result.cleaning_steps.clone(),
            transformations_applied: result.transformations_applied.clone(),
            feature_engineering_steps: result.feature_engineering_steps.clone(),
            actions: summary.actions.clone(),
            target_column: result.target_column.clone(),
            feature_importance: result.feature_importance.clone(),
            scaling_params: result.scaling_params.clone(),
            encoding_params: result.encoding_params.clone(),
            dataset_profile: DatasetProfileSummary::from_metadata(
                metadata,
                (summary.rows_after, summary.columns_after),
            ),
        }
    }

    /// Write a serializable report to a JSON file.
    ///
    /// If `report_base_name` is "train", the file will be "train_report.json".
    pub fn write_report_to_file<T: Serialize>(
        &self,
        report: &T,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
