//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Type inference for columns
//! - Per-type statistics (numeric, categorical, temporal)
//! - Encoding and scaling suggestions
//! - Target candidate scoring

mod statistics;
pub(crate) mod target;
mod type_inference;

use crate::dataset::{Dataset, Value};
use crate::error::{PreprocessingError, Result};
use crate::quality::QualityAssessor;
use crate::types::{
    ColumnProfile, ColumnStatistics, ColumnType, EncodingStrategy, FeatureMetadata, MlReadiness,
    ScalingStrategy,
};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::debug;

// Re-export for internal use
pub(crate) use statistics::{suggest_encoding, suggest_scaling};
pub(crate) use target::detect_target_column;
pub(crate) use type_inference::{infer_column_type, infer_dtype, infer_feature_type};

const SAMPLE_VALUES: usize = 5;

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    ///
    /// One profile is produced per column of the first row, in that order.
    /// Columns are profiled in parallel; the result does not depend on
    /// scheduling.
    pub fn extract_feature_metadata(dataset: &Dataset) -> Result<FeatureMetadata> {
        let columns = dataset.columns();
        if dataset.is_empty() || columns.is_empty() {
            return Err(PreprocessingError::EmptyInput);
        }

        let mut profiles: Vec<ColumnProfile> = columns
            .par_iter()
            .map(|name| Self::profile_column(dataset, name))
            .collect();

        target::mark_target_candidates(profiles.iter_mut());

        let column_profiles: IndexMap<String, ColumnProfile> = profiles
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        let count = |column_type: ColumnType| {
            column_profiles
                .values()
                .filter(|p| p.column_type == column_type)
                .count()
        };

        let mut metadata = FeatureMetadata {
            total_rows: dataset.len(),
            total_columns: column_profiles.len(),
            numeric_columns: count(ColumnType::Numeric),
            categorical_columns: count(ColumnType::Categorical),
            temporal_columns: count(ColumnType::Temporal),
            boolean_columns: count(ColumnType::Boolean),
            text_columns: count(ColumnType::Text),
            id_columns: count(ColumnType::Id),
            column_profiles,
            data_quality_score: 0.0,
            ml_readiness: MlReadiness::NotSuitable,
            preprocessing_recommendations: Vec::new(),
        };

        let assessment = QualityAssessor::assess(&metadata);
        metadata.data_quality_score = assessment.score;
        metadata.ml_readiness = assessment.readiness;
        metadata.preprocessing_recommendations = assessment.recommendations;

        Ok(metadata)
    }

    /// Profile a single column across every row.
    pub fn profile_column(dataset: &Dataset, name: &str) -> ColumnProfile {
        let total_rows = dataset.len();
        let values: Vec<&Value> = dataset
            .column_values(name)
            .filter(|v| !v.is_missing())
            .collect();

        let null_count = total_rows - values.len();
        let distinct: IndexSet<String> = values.iter().map(|v| v.to_key()).collect();
        let unique_count = distinct.len();

        let column_type = infer_column_type(name, &values);
        let dtype = infer_dtype(&values);

        let statistics = match column_type {
            ColumnType::Numeric => {
                statistics::numeric_statistics(&values).map(ColumnStatistics::Numeric)
            }
            ColumnType::Categorical => Some(ColumnStatistics::Categorical(
                statistics::categorical_statistics(&values),
            )),
            ColumnType::Temporal => Some(ColumnStatistics::Temporal(
                statistics::temporal_statistics(&values),
            )),
            ColumnType::Boolean | ColumnType::Text | ColumnType::Id => None,
        };

        let percentage = |count: usize| {
            if total_rows == 0 {
                0.0
            } else {
                count as f64 / total_rows as f64 * 100.0
            }
        };

        let mut profile = ColumnProfile {
            name: name.to_string(),
            column_type,
            dtype,
            null_count,
            null_percentage: percentage(null_count),
            unique_count,
            unique_percentage: percentage(unique_count),
            sample_values: distinct.into_iter().take(SAMPLE_VALUES).collect(),
            statistics,
            feature_type: infer_feature_type(column_type, &values, unique_count),
            encoding_suggested: EncodingStrategy::None,
            scaling_suggested: ScalingStrategy::None,
            is_target_candidate: false,
            target_score: 0.0,
        };
        profile.encoding_suggested = suggest_encoding(&profile);
        profile.scaling_suggested = suggest_scaling(&profile);

        debug!(
            column = name,
            column_type = column_type.as_str(),
            null_count,
            unique_count,
            "Profiled column"
        );

        profile
    }
}
