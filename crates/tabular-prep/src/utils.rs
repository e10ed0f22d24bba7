//! Shared utilities for the preprocessing pipeline.
//!
//! Helpers used across multiple modules: scalar coercion, boolean literal
//! detection, date parsing and the Pearson correlation kernel.

use crate::dataset::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Parse a string as a finite number.
///
/// Surrounding whitespace is ignored; anything else must be a plain decimal
/// or scientific literal.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(parse_number(" 42 "), Some(42.0));
/// assert_eq!(parse_number("1e3"), Some(1000.0));
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Rust accepts "inf"/"nan" spellings that are never numeric data.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check if a value can be coerced to a finite number.
pub fn is_numeric_value(value: &Value) -> bool {
    value.coerce_f64().is_some()
}

/// Format a number the way it is shown in column names and value keys:
/// integral values without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// =============================================================================
// Boolean Detection Utilities
// =============================================================================

/// Textual boolean literals accepted as `true`.
pub const BOOLEAN_TRUE_VALUES: [&str; 4] = ["true", "1", "yes", "y"];

/// Textual boolean literals accepted as `false`.
pub const BOOLEAN_FALSE_VALUES: [&str; 4] = ["false", "0", "no", "n"];

/// Check if a value is a boolean literal for type inference purposes:
/// a boolean, the numbers 0/1, or the texts `true`/`false`/`1`/`0`.
pub fn is_boolean_literal(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => *n == 0.0 || *n == 1.0,
        Value::Text(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "false" | "1" | "0"
        ),
        _ => false,
    }
}

/// Coerce a value to a boolean via literal sets and numeric truthiness.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if n.is_finite() => Some(*n != 0.0),
        Value::Text(s) => {
            let lower = s.trim().to_ascii_lowercase();
            if BOOLEAN_TRUE_VALUES.contains(&lower.as_str()) {
                Some(true)
            } else if BOOLEAN_FALSE_VALUES.contains(&lower.as_str()) {
                Some(false)
            } else {
                parse_number(&lower).map(|n| n != 0.0)
            }
        }
        _ => None,
    }
}

// =============================================================================
// Date Utilities
// =============================================================================

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d %B %Y", "%B %d, %Y", "%b %d, %Y",
];

/// Parse a date or date-time string in any of the common layouts.
///
/// Zoned timestamps (RFC 3339 / RFC 2822) are normalized to UTC. Returns
/// `None` for anything unparseable.
pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_utc());
    }

    // "2024-01-15T10:00:00Z" without offset digits
    let without_z = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(without_z, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Interpret a value as a point in time.
///
/// Numbers are epoch milliseconds.
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Text(s) => parse_datetime_str(s),
        Value::Number(n) if n.is_finite() => {
            DateTime::from_timestamp_millis(*n as i64).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}

/// Check if a value parses as a date.
pub fn is_date_like(value: &Value) -> bool {
    match value {
        Value::DateTime(_) => true,
        Value::Text(s) => parse_datetime_str(s).is_some(),
        _ => false,
    }
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Pearson correlation over paired samples.
///
/// `(nΣxy − ΣxΣy) / sqrt((nΣx² − (Σx)²)(nΣy² − (Σy)²))`, or 0 when the
/// denominator vanishes. Pairs are truncated to the shorter slice.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }

    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
        syy += y * y;
    }

    let n = n as f64;
    let numerator = n * sxy - sx * sy;
    let denominator = ((n * sxx - sx * sx) * (n * syy - sy * sy)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Nearest-rank quantile of an ascending slice: `sorted[floor(n * q)]`.
pub fn nearest_rank(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * q).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Median of an ascending slice (midpoint for even lengths).
pub fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 0 => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
        _ => sorted[n / 2],
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("hello"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
    }

    #[test]
    fn test_is_boolean_literal() {
        assert!(is_boolean_literal(&Value::Bool(false)));
        assert!(is_boolean_literal(&Value::Number(1.0)));
        assert!(is_boolean_literal(&Value::from("TRUE")));
        assert!(is_boolean_literal(&Value::from("0")));
        assert!(!is_boolean_literal(&Value::Number(2.0)));
        assert!(!is_boolean_literal(&Value::from("maybe")));
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_bool(&Value::from("yes")), Some(true));
        assert_eq!(coerce_bool(&Value::from("False")), Some(false));
        assert_eq!(coerce_bool(&Value::Number(0.0)), Some(false));
        assert_eq!(coerce_bool(&Value::from("2")), Some(true));
        assert_eq!(coerce_bool(&Value::from("maybe")), None);
        assert_eq!(coerce_bool(&Value::Null), None);
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        for input in ["2024-03-09", "2024/03/09", "03/09/2024", "March 9, 2024"] {
            let parsed = parse_datetime_str(input).unwrap_or_else(|| panic!("{input}"));
            assert_eq!(parsed.date(), expected, "{input}");
        }

        let with_time = parse_datetime_str("2024-03-09T14:30:00Z").unwrap();
        assert_eq!(with_time.time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());

        let zoned = parse_datetime_str("2024-03-09T14:30:00+02:00").unwrap();
        assert_eq!(zoned.time(), NaiveTime::from_hms_opt(12, 30, 0).unwrap());

        assert!(parse_datetime_str("not a date").is_none());
        assert!(parse_datetime_str("2024-13-40").is_none());
    }

    #[test]
    fn test_parse_datetime_from_epoch_millis() {
        let parsed = parse_datetime(&Value::Number(0.0)).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_pearson_perfect_and_degenerate() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let neg = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &neg) + 1.0).abs() < 1e-12);
        assert_eq!(pearson_correlation(&x, &[5.0, 5.0, 5.0, 5.0]), 0.0);
        assert_eq!(pearson_correlation(&[], &[]), 0.0);
    }

    #[test]
    fn test_quantiles() {
        let sorted: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(nearest_rank(&sorted, 0.25), 3.0);
        assert_eq!(nearest_rank(&sorted, 0.75), 8.0);
        assert_eq!(median_sorted(&sorted), 5.5);
        assert_eq!(median_sorted(&[1.0, 2.0, 9.0]), 2.0);
        assert_eq!(nearest_rank(&[7.0], 0.99), 7.0);
    }
}
