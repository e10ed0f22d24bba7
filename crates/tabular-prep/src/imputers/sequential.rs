//! Order-dependent imputation methods.
//!
//! Forward fill and linear-midpoint interpolation both depend on row order,
//! so they operate on the whole column at once.

use crate::dataset::{Row, Value};

/// Sequential imputation methods for filling missing values.
pub struct SequentialImputer;

impl SequentialImputer {
    /// Carry the last non-missing value forward.
    ///
    /// Cells before the first value get `default`. Returns the fill count.
    pub fn forward_fill(rows: &mut [Row], column: &str, default: &Value) -> usize {
        let mut last: Option<Value> = None;
        let mut filled = 0;

        for row in rows.iter_mut() {
            match row.get(column).filter(|v| !v.is_missing()).cloned() {
                Some(value) => last = Some(value),
                None => {
                    let fill = last.clone().unwrap_or_else(|| default.clone());
                    row.insert(column.to_string(), fill);
                    filled += 1;
                }
            }
        }

        filled
    }

    /// Fill each missing numeric cell with the midpoint of the nearest
    /// preceding and following original values.
    ///
    /// With one side available that side is used; with neither, `default`.
    /// Returns the fill count.
    pub fn interpolate(rows: &mut [Row], column: &str, default: f64) -> usize {
        let original: Vec<Option<f64>> = rows
            .iter()
            .map(|row| row.get(column).and_then(Value::coerce_f64))
            .collect();
        let missing: Vec<bool> = rows
            .iter()
            .map(|row| row.get(column).is_none_or(Value::is_missing))
            .collect();

        let mut previous: Vec<Option<f64>> = Vec::with_capacity(original.len());
        let mut carry = None;
        for value in &original {
            previous.push(carry);
            if value.is_some() {
                carry = *value;
            }
        }

        let mut next: Vec<Option<f64>> = vec![None; original.len()];
        carry = None;
        for (i, value) in original.iter().enumerate().rev() {
            next[i] = carry;
            if value.is_some() {
                carry = *value;
            }
        }

        let mut filled = 0;
        for (i, row) in rows.iter_mut().enumerate() {
            if !missing[i] {
                continue;
            }
            let fill = match (previous[i], next[i]) {
                (Some(p), Some(n)) => (p + n) / 2.0,
                (Some(p), None) => p,
                (None, Some(n)) => n,
                (None, None) => default,
            };
            row.insert(column.to_string(), Value::Number(fill));
            filled += 1;
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        Dataset::from_json(value).unwrap().into_rows()
    }

    fn column(rows: &[Row], name: &str) -> Vec<Value> {
        rows.iter().map(|r| r[name].clone()).collect()
    }

    #[test]
    fn test_forward_fill() {
        let mut data = rows(json!([
            {"c": null}, {"c": "a"}, {"c": null}, {"c": "b"}, {"c": " "}
        ]));
        let filled = SequentialImputer::forward_fill(&mut data, "c", &Value::from("Unknown"));
        assert_eq!(filled, 3);
        assert_eq!(
            column(&data, "c"),
            vec![
                Value::from("Unknown"),
                Value::from("a"),
                Value::from("a"),
                Value::from("b"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_interpolate_midpoint_and_edges() {
        let mut data = rows(json!([
            {"v": null}, {"v": 10}, {"v": null}, {"v": null}, {"v": 20}, {"v": null}
        ]));
        let filled = SequentialImputer::interpolate(&mut data, "v", 0.0);
        assert_eq!(filled, 4);
        assert_eq!(
            column(&data, "v"),
            vec![
                Value::Number(10.0),
                Value::Number(10.0),
                Value::Number(15.0),
                Value::Number(15.0),
                Value::Number(20.0),
                Value::Number(20.0),
            ]
        );
    }

    #[test]
    fn test_interpolate_without_values_uses_default() {
        let mut data = rows(json!([{"v": null}, {"v": null}]));
        SequentialImputer::interpolate(&mut data, "v", -1.0);
        assert_eq!(column(&data, "v"), vec![Value::Number(-1.0), Value::Number(-1.0)]);
    }
}
