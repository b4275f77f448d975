//! Field resolution against raw records

use crate::models::{FieldSpec, RawRecord};
use serde_json::Value;

/// Resolve a field specifier against a record.
///
/// Never fails: a key that does not exist resolves to `Value::Null`.
///
/// ```
/// use listing_normalizer::models::{FieldSpec, RawRecord};
/// use listing_normalizer::normalize::resolve::resolve;
/// use serde_json::{json, Value};
///
/// let record = RawRecord::with_attributes(7, Some("Car A"), None, json!({"Brand": "Acme"}));
/// assert_eq!(resolve(&record, "demo", &FieldSpec::SourceName), json!("demo"));
/// assert_eq!(resolve(&record, "demo", &FieldSpec::Attribute("Brand".into())), json!("Acme"));
/// assert_eq!(resolve(&record, "demo", &FieldSpec::Attribute("Color".into())), Value::Null);
/// ```
pub fn resolve(record: &RawRecord, source_name: &str, spec: &FieldSpec) -> Value {
    match spec {
        FieldSpec::SourceName => Value::String(source_name.to_string()),
        FieldSpec::RawColumn(key) => raw_column(record, key),
        FieldSpec::Attribute(key) => record.attributes.get(key).cloned().unwrap_or(Value::Null),
    }
}

fn raw_column(record: &RawRecord, key: &str) -> Value {
    let text = match key {
        "id" => return Value::from(record.id),
        "name" => &record.name,
        "price" | "price_text" => &record.price_text,
        "attributes_json" => &record.attributes_json,
        _ => return Value::Null,
    };
    text.clone().map_or(Value::Null, Value::String)
}
