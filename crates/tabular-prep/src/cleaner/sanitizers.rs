//! Value sanitization functions for cleaning text cells.

use crate::dataset::Value;

/// Strip NUL characters and surrounding whitespace from a text.
///
/// Returns `None` when nothing is left.
pub(crate) fn sanitize_text(value: &str) -> Option<String> {
    let cleaned: String = if value.contains('\0') {
        value.chars().filter(|&c| c != '\0').collect()
    } else {
        value.to_string()
    };

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == cleaned.len() {
        Some(cleaned)
    } else {
        Some(trimmed.to_string())
    }
}

/// Sanitize any value: texts are cleaned, empty texts become null,
/// everything else passes through.
pub(crate) fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::Text(s) => sanitize_text(s).map(Value::Text).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  hello "), Some("hello".to_string()));
        assert_eq!(sanitize_text("he\0llo"), Some("hello".to_string()));
        assert_eq!(sanitize_text("\0 \0"), None);
        assert_eq!(sanitize_text(""), None);
        assert_eq!(sanitize_text("clean"), Some("clean".to_string()));
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value(&Value::from("  ")), Value::Null);
        assert_eq!(sanitize_value(&Value::from(" a ")), Value::from("a"));
        assert_eq!(sanitize_value(&Value::Number(1.0)), Value::Number(1.0));
        assert_eq!(sanitize_value(&Value::Null), Value::Null);
    }
}
