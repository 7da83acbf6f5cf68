//! Coercion helpers for fields read from the schema-less document store.
//!
//! None of these fail: a value that does not have the expected shape is
//! mapped to the neutral value for its field (`0`, empty text, `None`).

use chrono::DateTime;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a numeric field the way the storefront stores it: a number, or a
/// number written as text. Returns `None` for anything else, including
/// non-finite results.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Money amount; malformed values count as zero.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    value.and_then(coerce_number).unwrap_or(0.0)
}

/// Free text. Null and missing become empty, other scalars keep their JSON text.
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Raw order date. Store timestamps (`{seconds, nanoseconds}` as written by
/// the client SDK, `{_seconds, _nanoseconds}` as written by the admin SDK)
/// and epoch milliseconds are rendered as RFC 3339 text; strings are kept
/// as-is so an unparseable value can still be reported.
pub fn coerce_date(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.to_rfc3339())
        }
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64);
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            match seconds {
                Some(secs) => DateTime::from_timestamp(secs, nanos.min(999_999_999) as u32)
                    .map(|dt| dt.to_rfc3339()),
                None => Some(Value::Object(map.clone()).to_string()),
            }
        }
        other => Some(other.to_string()),
    }
}

/// Percentage in `0..=100`, rounded to the nearest integer.
pub fn coerce_percent(value: Option<&Value>) -> u8 {
    value
        .and_then(coerce_number)
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_text(value.as_ref()))
}

pub(crate) fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number_accepts_numeric_text() {
        assert_eq!(coerce_number(&json!(100)), Some(100.0));
        assert_eq!(coerce_number(&json!(" 42.5 ")), Some(42.5));
        assert_eq!(coerce_number(&json!("not-a-number")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
    }

    #[test]
    fn test_coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(None), 0.0);
        assert_eq!(coerce_amount(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_amount(Some(&json!({"v": 1}))), 0.0);
        assert_eq!(coerce_amount(Some(&json!(25000))), 25000.0);
    }

    #[test]
    fn test_coerce_date_variants() {
        assert_eq!(coerce_date(None), None);
        assert_eq!(coerce_date(Some(&json!(null))), None);
        assert_eq!(coerce_date(Some(&json!("  "))), None);
        assert_eq!(
            coerce_date(Some(&json!("2024-03-01"))),
            Some("2024-03-01".to_string())
        );
        assert_eq!(
            coerce_date(Some(&json!({"seconds": 1704067200, "nanoseconds": 0}))),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            coerce_date(Some(&json!({"_seconds": 1704067200, "_nanoseconds": 0}))),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            coerce_date(Some(&json!(1704067200000i64))),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_coerce_percent_clamps() {
        assert_eq!(coerce_percent(Some(&json!(45))), 45);
        assert_eq!(coerce_percent(Some(&json!(140))), 100);
        assert_eq!(coerce_percent(Some(&json!(-3))), 0);
        assert_eq!(coerce_percent(Some(&json!("72.6"))), 73);
        assert_eq!(coerce_percent(None), 0);
    }
}
