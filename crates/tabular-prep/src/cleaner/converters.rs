//! Type conversion functions for data cleaning.
//!
//! Each converter takes an already sanitized value and returns either a value
//! of the column's type or [`Value::Null`].

use crate::dataset::Value;
use crate::types::ColumnType;
use crate::utils::{coerce_bool, parse_datetime};

/// Coerce a value to a finite number. Booleans become 1/0.
pub(crate) fn to_numeric(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        other => other.coerce_f64().map(Value::Number).unwrap_or(Value::Null),
    }
}

/// Coerce a value to a boolean via literal sets or numeric truthiness.
pub(crate) fn to_boolean(value: &Value) -> Value {
    coerce_bool(value).map(Value::Bool).unwrap_or(Value::Null)
}

/// Parse a value into a date-time.
pub(crate) fn to_temporal(value: &Value) -> Value {
    parse_datetime(value)
        .map(Value::DateTime)
        .unwrap_or(Value::Null)
}

/// Convert a sanitized value to the representation of `column_type`.
pub(crate) fn convert_for_type(value: Value, column_type: ColumnType) -> Value {
    if value.is_missing() {
        return Value::Null;
    }
    match column_type {
        ColumnType::Numeric => to_numeric(&value),
        ColumnType::Boolean => to_boolean(&value),
        ColumnType::Temporal => to_temporal(&value),
        ColumnType::Categorical | ColumnType::Text | ColumnType::Id => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_to_numeric() {
        assert_eq!(to_numeric(&Value::from("12.5")), Value::Number(12.5));
        assert_eq!(to_numeric(&Value::Bool(true)), Value::Number(1.0));
        assert_eq!(to_numeric(&Value::from("twelve")), Value::Null);
        assert_eq!(to_numeric(&Value::Number(f64::INFINITY)), Value::Null);
    }

    #[test]
    fn test_to_boolean() {
        assert_eq!(to_boolean(&Value::from("Yes")), Value::Bool(true));
        assert_eq!(to_boolean(&Value::Number(0.0)), Value::Bool(false));
        assert_eq!(to_boolean(&Value::from("perhaps")), Value::Null);
    }

    #[test]
    fn test_to_temporal() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(to_temporal(&Value::from("2024-05-01")), Value::DateTime(expected));
        assert_eq!(to_temporal(&Value::from("tomorrow")), Value::Null);
    }

    #[test]
    fn test_convert_for_type_keeps_categorical() {
        assert_eq!(
            convert_for_type(Value::Number(3.0), ColumnType::Categorical),
            Value::Number(3.0)
        );
        assert_eq!(convert_for_type(Value::Null, ColumnType::Numeric), Value::Null);
    }
}
