//! Numeric scaling with parameters fitted from the column profile.

use crate::dataset::{Dataset, Value};
use crate::types::{ColumnType, FeatureMetadata, NumericStatistics, ScalingParams, ScalingStrategy};
use anyhow::Result;
use tracing::{debug, warn};

/// Scales numeric columns using each profile's suggested strategy.
pub struct NumericScaler;

impl NumericScaler {
    /// Scale every numeric column present in `dataset`.
    ///
    /// Statistics come from the profile, not from the current data, so the
    /// returned parameters describe exactly the transform that was applied.
    pub fn scale(
        dataset: &Dataset,
        metadata: &FeatureMetadata,
    ) -> Result<(Dataset, Vec<String>, Vec<ScalingParams>)> {
        let mut steps = Vec::new();
        let mut params = Vec::new();
        let mut rows = dataset.rows().to_vec();
        let present = dataset.all_columns();

        for profile in metadata.profiles_of_type(ColumnType::Numeric) {
            let column = profile.name.as_str();
            if !present.iter().any(|c| c == column) {
                continue;
            }
            let Some(stats) = profile.numeric_stats() else {
                continue;
            };
            let Some(fitted) = Self::fit(column, profile.scaling_suggested, stats) else {
                if profile.scaling_suggested != ScalingStrategy::None {
                    warn!(column, "Zero spread; scaling skipped");
                }
                continue;
            };

            for row in rows.iter_mut() {
                if let Some(Value::Number(x)) = row.get_mut(column) {
                    *x = fitted.transform(*x);
                }
            }

            steps.push(format!(
                "Applied {} scaling to '{}' (center {:.4}, scale {:.4})",
                fitted.strategy.as_str(),
                column,
                fitted.center,
                fitted.scale
            ));
            debug!(column, strategy = fitted.strategy.as_str(), "Scaled column");
            params.push(fitted);
        }

        Ok((Dataset::new(rows), steps, params))
    }

    /// Center and scale for a strategy; `None` when the spread is zero.
    fn fit(
        column: &str,
        strategy: ScalingStrategy,
        stats: &NumericStatistics,
    ) -> Option<ScalingParams> {
        let (center, scale) = match strategy {
            ScalingStrategy::None => return None,
            ScalingStrategy::Standard => (stats.mean, stats.std),
            ScalingStrategy::MinMax => (stats.min, stats.max - stats.min),
            ScalingStrategy::Robust => (stats.median, stats.iqr),
        };
        if scale == 0.0 || !scale.is_finite() {
            return None;
        }
        Some(ScalingParams {
            column: column.to_string(),
            strategy,
            center,
            scale,
        })
    }
}
