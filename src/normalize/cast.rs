//! Type coercion of resolved values
//!
//! Casting never fails: anything that cannot be coerced becomes NULL.

use crate::export::sql::SqlValue;
use crate::models::ValueType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("Invalid regex"));

/// Currency markers removed before digit extraction, longest first
const CURRENCY_MARKERS: &[&str] = &["kr.", "kr"];

/// Cast a resolved value to the given semantic type
pub fn cast(value: &Value, value_type: ValueType) -> SqlValue {
    match value_type {
        ValueType::Text => as_text(value).into(),
        ValueType::Integer => as_integer(value).into(),
        ValueType::CurrencyInteger => as_currency_integer(value).into(),
    }
}

/// Stringify a value.
///
/// Strings are trimmed and empty strings become `None`; numbers and booleans
/// use their JSON spelling; lists and objects are stored as compact JSON.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Coerce a value to an integer.
///
/// Booleans become 0/1, floats truncate toward zero and strings keep only
/// their digits (`"1.234 km"` -> 1234).
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(truncate_float),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => digits_to_integer(s),
        _ => None,
    }
}

/// Coerce a price to an integer, removing currency noise first.
///
/// ```
/// use listing_normalizer::normalize::cast::as_currency_integer;
/// use serde_json::json;
///
/// assert_eq!(as_currency_integer(&json!("123.450 kr.")), Some(123450));
/// assert_eq!(as_currency_integer(&json!("kr. 0")), Some(0));
/// assert_eq!(as_currency_integer(&json!("  ")), None);
/// ```
pub fn as_currency_integer(value: &Value) -> Option<i64> {
    let text = as_text(value)?;
    let mut text = text.replace('\u{a0}', " ").to_lowercase();
    for marker in CURRENCY_MARKERS {
        text = text.replace(marker, "");
    }
    digits_to_integer(&text)
}

fn truncate_float(f: f64) -> Option<i64> {
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

fn digits_to_integer(s: &str) -> Option<i64> {
    let digits = NON_DIGITS.replace_all(s, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
