//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation from precomputed column
//! statistics.

use crate::dataset::{Row, Value};
use crate::types::ColumnProfile;
use crate::utils::format_number;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Apply mean imputation for a numeric column.
    pub fn apply_numeric_mean(
        rows: &mut [Row],
        profile: &ColumnProfile,
        processing_steps: &mut Vec<String>,
    ) {
        if let Some(stats) = profile.numeric_stats() {
            Self::fill_numeric(rows, &profile.name, stats.mean, processing_steps, "mean");
        }
    }

    /// Apply median imputation for a numeric column.
    pub fn apply_numeric_median(
        rows: &mut [Row],
        profile: &ColumnProfile,
        processing_steps: &mut Vec<String>,
    ) {
        if let Some(stats) = profile.numeric_stats() {
            Self::fill_numeric(rows, &profile.name, stats.median, processing_steps, "median");
        }
    }

    /// Apply mode imputation for a categorical column.
    pub fn apply_mode_imputation(
        rows: &mut [Row],
        profile: &ColumnProfile,
        processing_steps: &mut Vec<String>,
    ) {
        let Some(mode) = profile
            .categorical_stats()
            .and_then(|stats| stats.most_frequent.clone())
        else {
            return;
        };

        let filled = Self::fill_with_value(rows, &profile.name, &Value::Text(mode.clone()));
        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with mode: '{}'",
                filled, profile.name, mode
            ));
        }
    }

    fn fill_numeric(
        rows: &mut [Row],
        column: &str,
        value: f64,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) {
        if !value.is_finite() {
            return;
        }
        let filled = Self::fill_with_value(rows, column, &Value::Number(value));
        if filled > 0 {
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with {}: {}",
                filled,
                column,
                method,
                format_number(value)
            ));
        }
    }

    /// Replace every missing cell of `column` with `value`. Returns the fill count.
    pub fn fill_with_value(rows: &mut [Row], column: &str, value: &Value) -> usize {
        let mut filled = 0;
        for row in rows.iter_mut() {
            let missing = row.get(column).is_none_or(Value::is_missing);
            if missing {
                row.insert(column.to_string(), value.clone());
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    fn rows_and_profile(value: serde_json::Value, column: &str) -> (Vec<Row>, ColumnProfile) {
        let dataset = Dataset::from_json(value).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let profile = metadata.profile(column).unwrap().clone();
        (dataset.into_rows(), profile)
    }

    #[test]
    fn test_mean_imputation() {
        let (mut rows, profile) =
            rows_and_profile(json!([{"v": 10}, {"v": 20}, {"v": null}]), "v");
        let mut steps = Vec::new();
        StatisticalImputer::apply_numeric_mean(&mut rows, &profile, &mut steps);
        assert_eq!(rows[2]["v"], Value::Number(15.0));
        assert_eq!(steps, vec!["Filled 1 missing values in 'v' with mean: 15"]);
    }

    #[test]
    fn test_median_imputation() {
        let (mut rows, profile) =
            rows_and_profile(json!([{"v": 1}, {"v": 2}, {"v": 100}, {"v": null}]), "v");
        let mut steps = Vec::new();
        StatisticalImputer::apply_numeric_median(&mut rows, &profile, &mut steps);
        assert_eq!(rows[3]["v"], Value::Number(2.0));
    }

    #[test]
    fn test_mode_imputation() {
        let (mut rows, profile) = rows_and_profile(
            json!([{"c": "x"}, {"c": "y"}, {"c": "x"}, {"c": null}]),
            "c",
        );
        let mut steps = Vec::new();
        StatisticalImputer::apply_mode_imputation(&mut rows, &profile, &mut steps);
        assert_eq!(rows[3]["c"], Value::from("x"));
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_fill_absent_cells() {
        let mut rows = vec![Row::new()];
        let filled = StatisticalImputer::fill_with_value(&mut rows, "k", &Value::Number(1.0));
        assert_eq!(filled, 1);
        assert_eq!(rows[0]["k"], Value::Number(1.0));
    }
}
