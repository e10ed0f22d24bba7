//! Outlier handling module.
//!
//! Contains functions for treating outliers in numeric columns. Bounds are
//! the Tukey fences stored on each column's statistics; missing values are
//! never outliers.

use crate::config::OutlierStrategy;
use crate::dataset::{Dataset, Row, Value};
use crate::types::{ColumnProfile, ColumnType, FeatureMetadata, NumericStatistics};
use anyhow::Result;
use tracing::debug;

/// Skewness above which the log transform is applied.
const TRANSFORM_SKEWNESS: f64 = 1.0;

/// Handles outlier treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Handle outliers based on the selected strategy.
    pub fn handle_outliers(
        dataset: &Dataset,
        metadata: &FeatureMetadata,
        strategy: OutlierStrategy,
    ) -> Result<(Dataset, Vec<String>)> {
        let mut processing_steps = Vec::new();

        let targets: Vec<(&ColumnProfile, &NumericStatistics)> = metadata
            .column_profiles
            .values()
            .filter(|p| p.column_type == ColumnType::Numeric)
            .filter_map(|p| p.numeric_stats().map(|s| (p, s)))
            .filter(|(_, s)| s.outlier_count > 0)
            .collect();

        if targets.is_empty() || strategy == OutlierStrategy::Ignore {
            if strategy == OutlierStrategy::Ignore && !targets.is_empty() {
                processing_steps.push(format!(
                    "Kept outliers in {} columns as requested",
                    targets.len()
                ));
            }
            return Ok((dataset.clone(), processing_steps));
        }

        let result = match strategy {
            OutlierStrategy::Remove => Self::remove_outliers(dataset, &targets, &mut processing_steps),
            OutlierStrategy::Cap => Self::cap_outliers(dataset, &targets, &mut processing_steps),
            OutlierStrategy::Transform => {
                Self::transform_outliers(dataset, &targets, &mut processing_steps)
            }
            OutlierStrategy::Ignore => dataset.clone(),
        };

        Ok((result, processing_steps))
    }

    /// Clamp values to the Tukey fences.
    fn cap_outliers(
        dataset: &Dataset,
        targets: &[(&ColumnProfile, &NumericStatistics)],
        processing_steps: &mut Vec<String>,
    ) -> Dataset {
        let mut rows = dataset.rows().to_vec();

        for (profile, stats) in targets {
            let capped = Self::map_numbers(&mut rows, &profile.name, |x| {
                x.clamp(stats.lower_fence, stats.upper_fence)
            });
            if capped > 0 {
                processing_steps.push(format!(
                    "Capped {} outliers in '{}' to [{:.2}, {:.2}]",
                    capped, profile.name, stats.lower_fence, stats.upper_fence
                ));
            }
            debug!(column = %profile.name, capped, "Capped outliers");
        }

        Dataset::new(rows)
    }

    /// Remove rows outside the fences of any outlier column.
    fn remove_outliers(
        dataset: &Dataset,
        targets: &[(&ColumnProfile, &NumericStatistics)],
        processing_steps: &mut Vec<String>,
    ) -> Dataset {
        let original_rows = dataset.len();

        let kept: Dataset = dataset
            .iter()
            .filter(|row| {
                !targets.iter().any(|(profile, stats)| {
                    row.get(&profile.name)
                        .and_then(Value::as_f64)
                        .is_some_and(|x| stats.is_outlier(x))
                })
            })
            .cloned()
            .collect();

        let removed = original_rows - kept.len();
        processing_steps.push(format!(
            "Removed {} rows with outliers across {} columns",
            removed,
            targets.len()
        ));
        debug!(removed, "Removed outlier rows");

        kept
    }

    /// Apply ln(1 + x) to positive values of strongly right-skewed columns.
    fn transform_outliers(
        dataset: &Dataset,
        targets: &[(&ColumnProfile, &NumericStatistics)],
        processing_steps: &mut Vec<String>,
    ) -> Dataset {
        let mut rows = dataset.rows().to_vec();

        for (profile, stats) in targets {
            if stats.skewness <= TRANSFORM_SKEWNESS {
                debug!(column = %profile.name, skewness = stats.skewness, "Skipped log transform");
                continue;
            }
            let transformed = Self::map_numbers(&mut rows, &profile.name, |x| {
                if x > 0.0 { x.ln_1p() } else { x }
            });
            processing_steps.push(format!(
                "Applied log1p transform to {} values in '{}' (skewness {:.2})",
                transformed, profile.name, stats.skewness
            ));
        }

        Dataset::new(rows)
    }

    /// Apply `f` to every number in `column`; returns how many values changed.
    fn map_numbers(rows: &mut [Row], column: &str, f: impl Fn(f64) -> f64) -> usize {
        let mut changed = 0;
        for row in rows.iter_mut() {
            if let Some(Value::Number(x)) = row.get_mut(column) {
                let next = f(*x);
                if next != *x {
                    *x = next;
                    changed += 1;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    fn skewed() -> (Dataset, FeatureMetadata) {
        let dataset = Dataset::from_json(json!([
            {"v": 1}, {"v": 2}, {"v": 2}, {"v": 3}, {"v": 3},
            {"v": 3}, {"v": 4}, {"v": 4}, {"v": 5}, {"v": 100}, {"v": null}
        ]))
        .unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        (dataset, metadata)
    }

    #[test]
    fn test_cap_clamps_to_fences() {
        let (dataset, metadata) = skewed();
        let (capped, steps) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Cap).unwrap();
        // q25 = 2, q75 = 4, upper fence = 7
        assert_eq!(capped.get(9, "v"), Some(&Value::Number(7.0)));
        assert_eq!(capped.get(10, "v"), Some(&Value::Null));
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_cap_is_idempotent() {
        let (dataset, metadata) = skewed();
        let (once, _) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Cap).unwrap();
        let (twice, _) =
            OutlierHandler::handle_outliers(&once, &metadata, OutlierStrategy::Cap).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_drops_outlier_rows_only() {
        let (dataset, metadata) = skewed();
        let (kept, _) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Remove).unwrap();
        // The 100 row goes, the null row stays
        assert_eq!(kept.len(), 10);
        assert!(kept.iter().all(|row| row["v"] != Value::Number(100.0)));
    }

    #[test]
    fn test_transform_applies_log1p_when_skewed() {
        let (dataset, metadata) = skewed();
        let (transformed, steps) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Transform)
                .unwrap();
        assert_eq!(
            transformed.get(9, "v"),
            Some(&Value::Number(100f64.ln_1p()))
        );
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_transform_skips_symmetric_outliers() {
        let values = [-100, -4, -3, -2, -1, 0, 1, 2, 3, 4, 100];
        let rows: Vec<serde_json::Value> = values.iter().map(|v| json!({ "v": v })).collect();
        let dataset = Dataset::from_json(serde_json::Value::Array(rows)).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();

        let stats = metadata.profile("v").and_then(|p| p.numeric_stats()).unwrap();
        assert_eq!(stats.outlier_count, 2);
        assert!(stats.skewness <= TRANSFORM_SKEWNESS);

        let (transformed, steps) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Transform)
                .unwrap();
        assert_eq!(transformed, dataset);
        assert!(steps.is_empty());

        // Capping the same column does change it
        let (capped, _) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Cap).unwrap();
        assert_ne!(capped, dataset);
    }

    #[test]
    fn test_ignore_keeps_data() {
        let (dataset, metadata) = skewed();
        let (kept, _) =
            OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Ignore).unwrap();
        assert_eq!(kept, dataset);
    }
}
