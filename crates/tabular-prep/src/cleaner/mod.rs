//! Data cleaning module for preprocessing datasets.
//!
//! This module provides functionality for:
//! - Rebuilding rows from the profiled columns
//! - Text sanitization (NUL stripping, trimming)
//! - Type coercion driven by the inferred column types

mod converters;
mod sanitizers;

use crate::dataset::{Dataset, Row, Value};
use crate::types::FeatureMetadata;
use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, info};

pub(crate) use converters::convert_for_type;
pub(crate) use sanitizers::sanitize_value;

/// Data cleaner for automatic dataset cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean every row according to the column profiles.
    ///
    /// Rows are rebuilt from the profiled columns in profile order: absent
    /// cells become null and columns without a profile are dropped. Values
    /// that cannot be coerced to their column's type become null.
    ///
    /// Returns the cleaned dataset and human-readable cleaning steps.
    pub fn clean(
        &self,
        dataset: &Dataset,
        metadata: &FeatureMetadata,
    ) -> Result<(Dataset, Vec<String>)> {
        let mut cleaning_steps = Vec::new();
        let profiles = &metadata.column_profiles;

        info!("Cleaning {} rows across {} columns", dataset.len(), profiles.len());

        let mut coerced_to_null: IndexMap<&str, usize> = IndexMap::new();
        let mut sanitized_count = 0usize;

        let rows: Vec<Row> = dataset
            .iter()
            .map(|row| {
                profiles
                    .values()
                    .map(|profile| {
                        let raw = row.get(&profile.name).unwrap_or(&Value::Null);
                        let sanitized = sanitize_value(raw);
                        if matches!(raw, Value::Text(_)) && &sanitized != raw {
                            sanitized_count += 1;
                        }

                        let was_present = !sanitized.is_missing();
                        let converted = convert_for_type(sanitized, profile.column_type);
                        if was_present && converted.is_missing() {
                            *coerced_to_null.entry(profile.name.as_str()).or_insert(0) += 1;
                        }

                        (profile.name.clone(), converted)
                    })
                    .collect()
            })
            .collect();

        let dropped: Vec<String> = dataset
            .all_columns()
            .into_iter()
            .filter(|c| !profiles.contains_key(c))
            .collect();

        cleaning_steps.push(format!(
            "Rebuilt {} rows from {} profiled columns",
            rows.len(),
            profiles.len()
        ));

        if sanitized_count > 0 {
            cleaning_steps.push(format!(
                "Trimmed whitespace and control characters in {} text values",
                sanitized_count
            ));
        }

        if !dropped.is_empty() {
            cleaning_steps.push(format!(
                "Dropped {} columns missing from the profile: {:?}",
                dropped.len(),
                dropped
            ));
        }

        for (column, count) in &coerced_to_null {
            let column_type = profiles
                .get(*column)
                .map(|p| p.column_type.as_str())
                .unwrap_or("unknown");
            cleaning_steps.push(format!(
                "Column '{}': converted {} invalid values to null ({})",
                column, count, column_type
            ));
            debug!(column, count, "Coerced invalid values to null");
        }

        Ok((Dataset::new(rows), cleaning_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clean(value: serde_json::Value) -> (Dataset, Vec<String>) {
        let dataset = Dataset::from_json(value).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        DataCleaner.clean(&dataset, &metadata).unwrap()
    }

    #[test]
    fn test_coerces_by_column_type() {
        let (cleaned, steps) = clean(json!([
            {"amount": "10", "flag": "yes", "event_date": "2024-02-01", "city": "  Paris\u{0000} "},
            {"amount": 20, "flag": 0, "event_date": "not a date", "city": "Lyon"},
            {"amount": "30", "flag": "true", "event_date": "2024-02-03", "city": "Nice"},
            {"amount": "40", "flag": false, "event_date": "2024-02-04", "city": "Nice"},
            {"amount": "n/a", "flag": "1", "event_date": null, "city": ""}
        ]));

        assert_eq!(cleaned.get(0, "amount"), Some(&Value::Number(10.0)));
        assert_eq!(cleaned.get(4, "amount"), Some(&Value::Null));
        assert_eq!(cleaned.get(0, "flag"), Some(&Value::Bool(true)));
        assert_eq!(cleaned.get(1, "flag"), Some(&Value::Bool(false)));

        let feb_first = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(cleaned.get(0, "event_date"), Some(&Value::DateTime(feb_first)));
        assert_eq!(cleaned.get(1, "event_date"), Some(&Value::Null));

        assert_eq!(cleaned.get(0, "city"), Some(&Value::from("Paris")));
        assert_eq!(cleaned.get(4, "city"), Some(&Value::Null));

        assert!(steps.iter().any(|s| s.contains("'amount'")));
        assert!(steps.iter().any(|s| s.contains("'event_date'")));
    }

    #[test]
    fn test_rows_rebuilt_from_profile() {
        let (cleaned, steps) = clean(json!([
            {"a": 1, "b": "x"},
            {"b": "y", "extra": 5}
        ]));

        assert_eq!(cleaned.columns(), vec!["a", "b"]);
        assert_eq!(cleaned.get(1, "a"), Some(&Value::Null));
        assert!(cleaned.rows()[1].get("extra").is_none());
        assert!(steps.iter().any(|s| s.contains("extra")));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let dataset = Dataset::from_json(json!([{"amount": " 5 "}, {"amount": "6"}])).unwrap();
        let before = dataset.clone();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let _ = DataCleaner.clean(&dataset, &metadata).unwrap();
        assert_eq!(dataset, before);
    }
}
