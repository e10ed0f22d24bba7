//! Target-correlation feature selection.

use crate::dataset::{Dataset, Row, Value};
use crate::utils::pearson_correlation;
use anyhow::{Result, bail};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

/// Number of features kept when no explicit limit is given.
const DEFAULT_MAX_FEATURES: usize = 20;

/// Ranks columns by absolute Pearson correlation with the target.
pub struct FeatureSelector;

/// Outcome of feature selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub dataset: Dataset,
    /// |r| for every ranked column, best first.
    pub importance: IndexMap<String, f64>,
    pub selected: Vec<String>,
    pub dropped: Vec<String>,
}

impl FeatureSelector {
    /// Keep the target plus the `max_features` columns most correlated with it.
    pub fn select(dataset: &Dataset, target: &str, max_features: Option<usize>) -> Result<Selection> {
        // Union over all rows so columns absent from the first row still rank
        let columns = dataset.all_columns();
        if !columns.iter().any(|c| c == target) {
            bail!("Target column '{}' is not present in the dataset", target);
        }

        let target_values: Vec<f64> = dataset.column_values(target).map(coerce_number).collect();
        let candidates: Vec<&String> = columns.iter().filter(|c| *c != target).collect();

        let mut ranked: Vec<(String, f64)> = candidates
            .par_iter()
            .map(|column| {
                let values: Vec<f64> = dataset.column_values(column).map(coerce_number).collect();
                let r = pearson_correlation(&values, &target_values);
                ((*column).clone(), if r.is_finite() { r.abs() } else { 0.0 })
            })
            .collect();

        // Stable: ties keep column order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let limit = max_features.unwrap_or(DEFAULT_MAX_FEATURES.min(ranked.len()));
        let selected: Vec<String> = ranked.iter().take(limit).map(|(c, _)| c.clone()).collect();
        let dropped: Vec<String> = ranked.iter().skip(limit).map(|(c, _)| c.clone()).collect();
        debug!(kept = selected.len(), dropped = dropped.len(), "Ranked features");

        let rows: Vec<Row> = dataset
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| *k == target || selected.contains(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect();

        Ok(Selection {
            dataset: Dataset::new(rows),
            importance: ranked.into_iter().collect(),
            selected,
            dropped,
        })
    }
}

/// Numbers and numeric text as-is, booleans as 1/0, everything else 0.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        other => other.coerce_f64().unwrap_or(0.0),
    }
}
