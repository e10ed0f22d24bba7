//! Pairwise Pearson correlation between numeric columns.

use crate::dataset::{Dataset, Value};
use crate::utils::pearson_correlation;
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

/// Square, symmetric correlation matrix keyed by column name.
pub type CorrelationMatrix = IndexMap<String, IndexMap<String, f64>>;

/// Columns whose non-missing values are all numbers (at least one).
pub fn numeric_columns(dataset: &Dataset) -> Vec<String> {
    dataset
        .all_columns()
        .into_iter()
        .filter(|column| {
            let mut present = dataset.column_values(column).filter(|v| !v.is_missing()).peekable();
            present.peek().is_some() && present.all(|v| matches!(v, Value::Number(_)))
        })
        .collect()
}

/// Build the correlation matrix over every numeric column.
///
/// Each pair uses only rows where both values are numbers. The diagonal is
/// exactly 1 and each unordered pair is computed once, then mirrored.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns = numeric_columns(dataset);
    let n = columns.len();

    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| dataset.column_values(c).map(Value::as_f64).collect())
        .collect();

    // Upper triangle only
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<((usize, usize), f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            ((i, j), pearson_correlation(&xs, &ys))
        })
        .collect();

    let mut matrix: CorrelationMatrix = columns
        .iter()
        .map(|c| {
            let row: IndexMap<String, f64> = columns
                .iter()
                .map(|o| (o.clone(), if o == c { 1.0 } else { 0.0 }))
                .collect();
            (c.clone(), row)
        })
        .collect();

    for ((i, j), r) in coefficients {
        if let Some(row) = matrix.get_mut(&columns[i]) {
            row.insert(columns[j].clone(), r);
        }
        if let Some(row) = matrix.get_mut(&columns[j]) {
            row.insert(columns[i].clone(), r);
        }
    }

    debug!(columns = n, pairs = pairs.len(), "Built correlation matrix");
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagonal_and_symmetry() {
        let dataset = Dataset::from_json(json!([
            {"a": 1, "b": 2, "c": 9, "tag": "x"},
            {"a": 2, "b": 4, "c": 3, "tag": "y"},
            {"a": 3, "b": 7, "c": 5, "tag": "z"},
            {"a": 4, "b": 8, "c": 1, "tag": "x"}
        ]))
        .unwrap();
        let matrix = correlation_matrix(&dataset);

        assert_eq!(matrix.len(), 3);
        assert!(!matrix.contains_key("tag"));
        for (a, row) in &matrix {
            assert_eq!(row[a], 1.0);
            for (b, r) in row {
                assert!((r - matrix[b][a]).abs() < 1e-12);
            }
        }
        assert!(matrix["a"]["b"] > 0.9);
    }

    #[test]
    fn test_pairwise_complete_rows() {
        let dataset = Dataset::from_json(json!([
            {"a": 1, "b": 10},
            {"a": 2, "b": null},
            {"a": 3, "b": 30},
            {"a": 4, "b": 40}
        ]))
        .unwrap();
        let matrix = correlation_matrix(&dataset);
        assert!((matrix["a"]["b"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_column_excluded() {
        let dataset = Dataset::from_json(json!([{"m": 1, "n": 2}, {"m": "two", "n": 3}])).unwrap();
        assert_eq!(numeric_columns(&dataset), vec!["n"]);
    }
}
