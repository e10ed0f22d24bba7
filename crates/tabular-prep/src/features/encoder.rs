//! Categorical encoding.

use crate::dataset::{Dataset, Row, Value};
use crate::types::{ColumnType, EncodingParams, EncodingStrategy, FeatureMetadata};
use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Maximum number of indicator columns produced for one categorical column.
const MAX_ONE_HOT_CATEGORIES: usize = 10;

/// Encodes categorical columns as label codes or one-hot indicators.
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    forced: Option<EncodingStrategy>,
    exclude: Option<String>,
}

impl CategoricalEncoder {
    /// `forced` overrides the per-column suggestion when set.
    pub fn new(forced: Option<EncodingStrategy>) -> Self {
        Self {
            forced,
            exclude: None,
        }
    }

    /// Leave `column` untouched (used for the target).
    pub fn excluding(mut self, column: Option<&str>) -> Self {
        self.exclude = column.map(str::to_string);
        self
    }

    /// Resolve the strategy actually applied to a column.
    ///
    /// Suggestions of `label` and `one_hot` both expand to indicators; only a
    /// forced `label` produces integer codes.
    fn resolve(&self, suggested: EncodingStrategy) -> EncodingStrategy {
        match (self.forced, suggested) {
            (Some(forced), _) => forced,
            (None, EncodingStrategy::Label | EncodingStrategy::OneHot) => EncodingStrategy::OneHot,
            (None, other) => other,
        }
    }

    /// Encode every categorical column present in `dataset`.
    pub fn encode(
        &self,
        dataset: &Dataset,
        metadata: &FeatureMetadata,
    ) -> Result<(Dataset, Vec<String>, Vec<EncodingParams>)> {
        let mut steps = Vec::new();
        let mut params = Vec::new();
        let mut rows = dataset.rows().to_vec();
        let present = dataset.all_columns();

        for profile in metadata.profiles_of_type(ColumnType::Categorical) {
            let column = profile.name.as_str();
            if !present.iter().any(|c| c == column) || self.exclude.as_deref() == Some(column) {
                continue;
            }

            let categories = distinct_values(&rows, column);
            match self.resolve(profile.encoding_suggested) {
                EncodingStrategy::Label => {
                    let mapping = label_encode(&mut rows, column, &categories);
                    steps.push(format!(
                        "Label-encoded '{}' into {} codes",
                        column,
                        mapping.len()
                    ));
                    params.push(EncodingParams::Label {
                        column: column.to_string(),
                        mapping,
                    });
                }
                EncodingStrategy::OneHot => {
                    let categories: Vec<String> =
                        categories.into_iter().take(MAX_ONE_HOT_CATEGORIES).collect();
                    for clash in categories
                        .iter()
                        .map(|category| format!("{column}_{category}"))
                        .filter(|output| present.contains(output))
                    {
                        warn!(column, output = %clash, "Indicator column overwrites an existing column");
                        steps.push(format!(
                            "Overwrote existing column '{}' with an indicator for '{}'",
                            clash, column
                        ));
                    }
                    let output_columns = one_hot_encode(&mut rows, column, &categories);
                    steps.push(format!(
                        "One-hot encoded '{}' into {} columns",
                        column,
                        output_columns.len()
                    ));
                    params.push(EncodingParams::OneHot {
                        column: column.to_string(),
                        categories,
                        output_columns,
                    });
                }
                strategy @ (EncodingStrategy::None | EncodingStrategy::Target) => {
                    debug!(column, ?strategy, "Column left unencoded");
                }
            }
        }

        Ok((Dataset::new(rows), steps, params))
    }
}

/// Distinct non-missing values of `column`, first-seen order.
fn distinct_values(rows: &[Row], column: &str) -> Vec<String> {
    let mut seen: IndexMap<String, ()> = IndexMap::new();
    for value in rows.iter().filter_map(|row| row.get(column)) {
        if !value.is_missing() {
            seen.entry(value.to_key()).or_insert(());
        }
    }
    seen.into_keys().collect()
}

/// Replace values with their code; missing values become 0.
fn label_encode(rows: &mut [Row], column: &str, categories: &[String]) -> IndexMap<String, usize> {
    let mapping: IndexMap<String, usize> = categories
        .iter()
        .enumerate()
        .map(|(code, value)| (value.clone(), code))
        .collect();

    for row in rows.iter_mut() {
        let code = row
            .get(column)
            .filter(|v| !v.is_missing())
            .and_then(|v| mapping.get(&v.to_key()))
            .copied()
            .unwrap_or(0);
        row.insert(column.to_string(), Value::from(code as i64));
    }

    mapping
}

/// Append one 0/1 column per category and remove the original column.
fn one_hot_encode(rows: &mut [Row], column: &str, categories: &[String]) -> Vec<String> {
    let output_columns: Vec<String> = categories
        .iter()
        .map(|category| format!("{column}_{category}"))
        .collect();

    for row in rows.iter_mut() {
        let key = row
            .shift_remove(column)
            .filter(|v| !v.is_missing())
            .map(|v| v.to_key());
        for (category, output) in categories.iter().zip(&output_columns) {
            let hit = key.as_deref() == Some(category.as_str());
            row.insert(output.clone(), Value::from(if hit { 1 } else { 0 }));
        }
    }

    output_columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use serde_json::json;

    fn encoded(
        value: serde_json::Value,
        forced: Option<EncodingStrategy>,
    ) -> (Dataset, Vec<EncodingParams>) {
        let dataset = Dataset::from_json(value).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let (data, _, params) = CategoricalEncoder::new(forced)
            .encode(&dataset, &metadata)
            .unwrap();
        (data, params)
    }

    fn colors() -> serde_json::Value {
        json!([
            {"color": "A", "n": 1.5},
            {"color": "B", "n": 2.5},
            {"color": "A", "n": 3.5},
            {"color": "C", "n": 4.5}
        ])
    }

    #[test]
    fn test_one_hot_indicators_sum_to_one() {
        let (data, params) = encoded(colors(), None);

        assert_eq!(data.columns(), vec!["n", "color_A", "color_B", "color_C"]);
        for row in data.iter() {
            let total: f64 = ["color_A", "color_B", "color_C"]
                .iter()
                .filter_map(|c| row[*c].as_f64())
                .sum();
            assert_eq!(total, 1.0);
        }
        assert!(matches!(&params[0], EncodingParams::OneHot { categories, .. } if categories.len() == 3));
    }

    #[test]
    fn test_one_hot_reports_overwritten_column() {
        let dataset = Dataset::from_json(json!([
            {"color": "A", "color_A": 7.5},
            {"color": "B", "color_A": 8.5},
            {"color": "A", "color_A": 9.5}
        ]))
        .unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let (data, steps, _) = CategoricalEncoder::default()
            .encode(&dataset, &metadata)
            .unwrap();

        assert!(steps.iter().any(|s| s.contains("Overwrote existing column 'color_A'")));
        let indicators: Vec<&Value> = data.column_values("color_A").collect();
        assert_eq!(
            indicators,
            vec![&Value::Number(1.0), &Value::Number(0.0), &Value::Number(1.0)]
        );
    }

    #[test]
    fn test_forced_label_codes() {
        let (data, params) = encoded(colors(), Some(EncodingStrategy::Label));

        let codes: Vec<&Value> = data.column_values("color").collect();
        assert_eq!(
            codes,
            vec![
                &Value::Number(0.0),
                &Value::Number(1.0),
                &Value::Number(0.0),
                &Value::Number(2.0)
            ]
        );
        let EncodingParams::Label { mapping, .. } = &params[0] else {
            panic!("expected label params");
        };
        assert_eq!(mapping.get("C"), Some(&2));
    }

    #[test]
    fn test_forced_none_passes_through() {
        let dataset = Dataset::from_json(colors()).unwrap();
        let (data, params) = encoded(colors(), Some(EncodingStrategy::None));
        assert_eq!(data, dataset);
        assert!(params.is_empty());
    }

    #[test]
    fn test_excluded_column_kept() {
        let dataset = Dataset::from_json(colors()).unwrap();
        let metadata = DataProfiler::extract_feature_metadata(&dataset).unwrap();
        let (data, _, params) = CategoricalEncoder::default()
            .excluding(Some("color"))
            .encode(&dataset, &metadata)
            .unwrap();
        assert_eq!(data, dataset);
        assert!(params.is_empty());
    }

    #[test]
    fn test_label_missing_maps_to_zero() {
        let mut rows = Dataset::from_json(json!([{"c": "x"}, {"c": null}, {"c": "y"}]))
            .unwrap()
            .into_rows();
        let categories = distinct_values(&rows, "c");
        label_encode(&mut rows, "c", &categories);
        assert_eq!(rows[1]["c"], Value::Number(0.0));
        assert_eq!(rows[2]["c"], Value::Number(1.0));
    }

    #[test]
    fn test_one_hot_caps_categories() {
        let mut rows: Vec<Row> = (0..15)
            .map(|i| Row::from([("c".to_string(), Value::from(format!("v{i}")))]))
            .collect();
        let categories: Vec<String> = distinct_values(&rows, "c")
            .into_iter()
            .take(MAX_ONE_HOT_CATEGORIES)
            .collect();
        let outputs = one_hot_encode(&mut rows, "c", &categories);
        assert_eq!(outputs.len(), 10);
        // Values beyond the first ten get all-zero indicators
        assert!(rows[12].values().all(|v| *v == Value::Number(0.0)));
    }
}
