//! Feature engineering: date parts and numeric interactions.

use crate::dataset::{Dataset, Value};
use crate::types::{ColumnType, FeatureMetadata};
use crate::utils::parse_datetime;
use anyhow::Result;
use chrono::{Datelike, Weekday};
use tracing::debug;

/// Maximum number of adjacent numeric pairs that get interaction features.
const MAX_INTERACTION_PAIRS: usize = 3;

/// Derives new columns from temporal and numeric columns.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Add date-part columns and numeric interaction columns.
    ///
    /// New columns are only written to rows where they can be computed, so
    /// rows with a malformed date or a zero operand simply lack them.
    pub fn engineer(
        dataset: &Dataset,
        metadata: &FeatureMetadata,
    ) -> Result<(Dataset, Vec<String>)> {
        let mut steps = Vec::new();
        let mut rows = dataset.rows().to_vec();
        let present = dataset.all_columns();
        let is_present = |name: &str| present.iter().any(|c| c == name);

        for profile in metadata.profiles_of_type(ColumnType::Temporal) {
            if !is_present(&profile.name) {
                continue;
            }
            let column = profile.name.as_str();
            let mut derived = 0usize;

            for row in rows.iter_mut() {
                let Some(date) = row.get(column).and_then(parse_datetime) else {
                    continue;
                };
                let weekday = date.weekday();
                let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);

                row.insert(format!("{column}_year"), Value::from(date.year()));
                row.insert(format!("{column}_month"), Value::from(date.month() as i32));
                row.insert(format!("{column}_day"), Value::from(date.day() as i32));
                row.insert(
                    format!("{column}_day_of_week"),
                    Value::from(weekday.num_days_from_sunday() as i32),
                );
                row.insert(
                    format!("{column}_is_weekend"),
                    Value::from(if is_weekend { 1 } else { 0 }),
                );
                derived += 1;
            }

            if derived > 0 {
                steps.push(format!(
                    "Extracted year, month, day, day_of_week and is_weekend from '{}' ({} rows)",
                    column, derived
                ));
            }
            debug!(column, derived, "Extracted date features");
        }

        let numeric: Vec<&str> = metadata
            .profiles_of_type(ColumnType::Numeric)
            .map(|p| p.name.as_str())
            .filter(|name| is_present(name))
            .collect();

        for pair in numeric.windows(2).take(MAX_INTERACTION_PAIRS) {
            let (a, b) = (pair[0], pair[1]);
            let product = format!("{a}_x_{b}");
            let ratio = format!("{a}_div_{b}");
            let mut derived = 0usize;

            for row in rows.iter_mut() {
                let x = row.get(a).and_then(Value::as_f64);
                let y = row.get(b).and_then(Value::as_f64);
                if let (Some(x), Some(y)) = (x, y)
                    && x != 0.0
                    && y != 0.0
                {
                    row.insert(product.clone(), Value::Number(x * y));
                    row.insert(ratio.clone(), Value::Number(x / y));
                    derived += 1;
                }
            }

            steps.push(format!(
                "Created interaction features '{}' and '{}' ({} rows)",
                product, ratio, derived
            ));
        }

        Ok((Dataset::new(rows), steps))
    }
}
