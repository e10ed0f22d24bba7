//! Type inference logic for column analysis.

use crate::dataset::{Value, ValueKind};
use crate::types::{ColumnType, Dtype, FeatureType};
use crate::utils::{is_boolean_literal, is_date_like, is_numeric_value};
use once_cell::sync::Lazy;
use regex::Regex;

// Name patterns - compiled once at startup
static ID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)id|_id|id$").expect("Invalid regex: id name"));

static TEMPORAL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)date|time|timestamp").expect("Invalid regex: temporal name"));

/// Share of values that must match a predicate for the type to be assigned.
const TYPE_THRESHOLD: f64 = 0.8;

/// Average string length above which a column counts as free text.
const TEXT_LENGTH_THRESHOLD: f64 = 50.0;

/// Number of leading values inspected for the raw dtype.
const DTYPE_SAMPLE_SIZE: usize = 100;

/// Ordered vocabularies that make a categorical column ordinal.
const ORDINAL_SCALES: &[&[&str]] = &[
    &["low", "medium", "high"],
    &["very low", "low", "medium", "high", "very high"],
    &["small", "medium", "large"],
    &["xs", "s", "m", "l", "xl", "xxl"],
    &["poor", "fair", "good", "very good", "excellent"],
    &["never", "rarely", "sometimes", "often", "always"],
    &["strongly disagree", "disagree", "neutral", "agree", "strongly agree"],
    &["bronze", "silver", "gold", "platinum"],
    &["beginner", "intermediate", "advanced", "expert"],
];

/// Infer the semantic type of a column from its name and non-missing values.
///
/// Name rules win over value rules. A column without any non-missing value
/// falls through to categorical.
pub(crate) fn infer_column_type(name: &str, values: &[&Value]) -> ColumnType {
    if ID_NAME.is_match(name) {
        return ColumnType::Id;
    }
    if TEMPORAL_NAME.is_match(name) {
        return ColumnType::Temporal;
    }
    if values.is_empty() {
        return ColumnType::Categorical;
    }

    let total = values.len() as f64;

    let boolean_count = values.iter().filter(|v| is_boolean_literal(v)).count();
    if boolean_count as f64 / total >= TYPE_THRESHOLD {
        return ColumnType::Boolean;
    }

    let numeric_count = values.iter().filter(|v| is_numeric_value(v)).count();
    if numeric_count as f64 / total >= TYPE_THRESHOLD {
        return ColumnType::Numeric;
    }

    let avg_length = values
        .iter()
        .map(|v| v.to_string().chars().count())
        .sum::<usize>() as f64
        / total;
    if avg_length > TEXT_LENGTH_THRESHOLD {
        return ColumnType::Text;
    }

    ColumnType::Categorical
}

/// Infer the raw scalar representation from the first values of a column.
pub(crate) fn infer_dtype(values: &[&Value]) -> Dtype {
    let sample = &values[..values.len().min(DTYPE_SAMPLE_SIZE)];
    if sample.is_empty() {
        return Dtype::String;
    }

    let all_kind = |kind: ValueKind| sample.iter().all(|v| v.kind() == kind);

    if all_kind(ValueKind::Number) {
        Dtype::Number
    } else if all_kind(ValueKind::Bool) {
        Dtype::Boolean
    } else if sample.iter().all(|v| is_date_like(v)) {
        Dtype::Date
    } else {
        Dtype::String
    }
}

/// Refine a column type into a feature type.
pub(crate) fn infer_feature_type(
    column_type: ColumnType,
    values: &[&Value],
    unique_count: usize,
) -> FeatureType {
    match column_type {
        ColumnType::Numeric => {
            let all_integral = values
                .iter()
                .filter_map(|v| v.coerce_f64())
                .all(|n| n.fract() == 0.0);
            if all_integral && unique_count <= 20 {
                FeatureType::Discrete
            } else {
                FeatureType::Continuous
            }
        }
        ColumnType::Categorical => {
            if is_ordinal(values) {
                FeatureType::Ordinal
            } else {
                FeatureType::Nominal
            }
        }
        ColumnType::Temporal => FeatureType::Datetime,
        ColumnType::Boolean => FeatureType::Binary,
        ColumnType::Text => FeatureType::Text,
        ColumnType::Id => FeatureType::Identifier,
    }
}

/// Every distinct value belongs to one known ordered scale.
fn is_ordinal(values: &[&Value]) -> bool {
    if values.is_empty() {
        return false;
    }

    let lowered: Vec<String> = values
        .iter()
        .map(|v| v.to_string().trim().to_lowercase())
        .collect();

    ORDINAL_SCALES
        .iter()
        .any(|scale| lowered.iter().all(|v| scale.contains(&v.as_str())))
}
