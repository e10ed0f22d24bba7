//! Imputation module for handling missing values.
//!
//! This module provides various imputation strategies including:
//! - Row dropping
//! - Statistical imputation (mean, median, mode)
//! - Sequential imputation (forward fill, interpolation)

mod sequential;
mod statistical;

pub use sequential::SequentialImputer;
pub use statistical::StatisticalImputer;

use crate::config::MissingValueStrategy;
use crate::dataset::{Dataset, Value};
use crate::types::{ColumnType, FeatureMetadata};
use anyhow::Result;
use tracing::{debug, info};

/// Fills or drops missing values according to a single strategy.
#[derive(Debug, Clone)]
pub struct MissingValueImputer {
    strategy: MissingValueStrategy,
    numeric_default: f64,
    categorical_default: String,
}

impl MissingValueImputer {
    pub fn new(
        strategy: MissingValueStrategy,
        numeric_default: f64,
        categorical_default: impl Into<String>,
    ) -> Self {
        Self {
            strategy,
            numeric_default,
            categorical_default: categorical_default.into(),
        }
    }

    /// Apply the configured strategy.
    ///
    /// Missing counts are measured on `dataset`, so columns without missing
    /// values are never touched.
    pub fn impute(
        &self,
        dataset: &Dataset,
        metadata: &FeatureMetadata,
    ) -> Result<(Dataset, Vec<String>)> {
        let mut steps = Vec::new();

        let columns_with_missing: Vec<&str> = metadata
            .column_profiles
            .keys()
            .map(String::as_str)
            .filter(|c| dataset.missing_count(c) > 0)
            .collect();

        info!(
            strategy = self.strategy.as_str(),
            "Imputing missing values in {} columns",
            columns_with_missing.len()
        );

        if columns_with_missing.is_empty() {
            return Ok((dataset.clone(), steps));
        }

        if self.strategy == MissingValueStrategy::Drop {
            let before = dataset.len();
            let kept: Dataset = dataset
                .iter()
                .filter(|row| {
                    columns_with_missing
                        .iter()
                        .all(|c| row.get(*c).is_some_and(|v| !v.is_missing()))
                })
                .cloned()
                .collect();
            let removed = before - kept.len();
            steps.push(format!(
                "Dropped {} rows with missing values ({} remaining)",
                removed,
                kept.len()
            ));
            debug!(removed, "Dropped rows with missing values");
            return Ok((kept, steps));
        }

        let mut rows = dataset.rows().to_vec();
        let categorical_default = Value::Text(self.categorical_default.clone());

        for column in columns_with_missing {
            let Some(profile) = metadata.profile(column) else {
                continue;
            };
            let is_numeric = profile.column_type == ColumnType::Numeric;

            match self.strategy {
                MissingValueStrategy::Mean if is_numeric => {
                    StatisticalImputer::apply_numeric_mean(&mut rows, profile, &mut steps);
                }
                MissingValueStrategy::Median if is_numeric => {
                    StatisticalImputer::apply_numeric_median(&mut rows, profile, &mut steps);
                }
                MissingValueStrategy::Mode if profile.column_type == ColumnType::Categorical => {
                    StatisticalImputer::apply_mode_imputation(&mut rows, profile, &mut steps);
                }
                MissingValueStrategy::ForwardFill => {
                    let default = if is_numeric {
                        Value::Number(self.numeric_default)
                    } else {
                        categorical_default.clone()
                    };
                    let filled = SequentialImputer::forward_fill(&mut rows, column, &default);
                    steps.push(format!(
                        "Forward-filled {} missing values in '{}'",
                        filled, column
                    ));
                }
                MissingValueStrategy::Interpolate if is_numeric => {
                    let filled =
                        SequentialImputer::interpolate(&mut rows, column, self.numeric_default);
                    steps.push(format!(
                        "Interpolated {} missing values in '{}'",
                        filled, column
                    ));
                }
                _ => {
                    debug!(column, "Strategy does not apply to column type; left as-is");
                }
            }
        }

        Ok((Dataset::new(rows), steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DataCleaner;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    fn prepared(value: serde_json::Value) -> (Dataset, FeatureMetadata) {
        let raw = Dataset::from_json(value).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&raw).unwrap();
        let (cleaned, _) = DataCleaner.clean(&raw, &metadata).unwrap();
        (cleaned, metadata)
    }

    fn imputer(strategy: MissingValueStrategy) -> MissingValueImputer {
        MissingValueImputer::new(strategy, 0.0, "Unknown")
    }

    #[test]
    fn test_drop_removes_incomplete_rows() {
        let (data, metadata) = prepared(json!([
            {"a": 1, "b": "x"},
            {"a": null, "b": "y"},
            {"a": 3, "b": ""},
            {"a": 4, "b": "z"}
        ]));
        let (result, steps) = imputer(MissingValueStrategy::Drop)
            .impute(&data, &metadata)
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.len() <= data.len());
        for row in result.iter() {
            assert!(row.values().all(|v| !v.is_missing()));
        }
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_mean_ignores_categorical() {
        let (data, metadata) = prepared(json!([
            {"a": 10, "b": "x"},
            {"a": 20, "b": null},
            {"a": null, "b": "x"}
        ]));
        let (result, _) = imputer(MissingValueStrategy::Mean)
            .impute(&data, &metadata)
            .unwrap();
        assert_eq!(result.get(2, "a"), Some(&Value::Number(15.0)));
        assert_eq!(result.get(1, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_forward_fill_uses_defaults() {
        let (data, metadata) = prepared(json!([
            {"a": null, "b": null},
            {"a": 2, "b": "x"},
            {"a": null, "b": null}
        ]));
        let (result, _) = imputer(MissingValueStrategy::ForwardFill)
            .impute(&data, &metadata)
            .unwrap();
        assert_eq!(result.get(0, "a"), Some(&Value::Number(0.0)));
        assert_eq!(result.get(0, "b"), Some(&Value::from("Unknown")));
        assert_eq!(result.get(2, "a"), Some(&Value::Number(2.0)));
        assert_eq!(result.get(2, "b"), Some(&Value::from("x")));
    }

    #[test]
    fn test_complete_columns_untouched() {
        let (data, metadata) = prepared(json!([{"a": 1}, {"a": 2}]));
        let (result, steps) = imputer(MissingValueStrategy::Interpolate)
            .impute(&data, &metadata)
            .unwrap();
        assert_eq!(result, data);
        assert!(steps.is_empty());
    }
}
