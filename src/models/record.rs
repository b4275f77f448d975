//! Raw records read from source stores

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A listing row exactly as the raw store returns it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRow {
    pub id: i64,
    pub name: Option<String>,
    pub price_text: Option<String>,
    /// JSON object text, possibly empty or malformed
    pub attributes_json: Option<String>,
}

/// A listing with its attribute bag deserialized.
///
/// Immutable once built; the raw attribute text is kept so that
/// `sqlite:attributes_json` can still address it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub id: i64,
    pub name: Option<String>,
    pub price_text: Option<String>,
    pub attributes: Map<String, Value>,
    pub attributes_json: Option<String>,
}

impl RawRecord {
    /// Build a record from a raw row.
    ///
    /// A payload that is not a JSON object yields an empty attribute bag and
    /// a warning; the record itself is still usable.
    pub fn from_row(row: RawRow) -> Self {
        let attributes = parse_attributes(row.id, row.attributes_json.as_deref());
        Self {
            id: row.id,
            name: row.name,
            price_text: row.price_text,
            attributes,
            attributes_json: row.attributes_json,
        }
    }

    /// Build a record directly from an attribute object
    pub fn with_attributes(
        id: i64,
        name: Option<&str>,
        price_text: Option<&str>,
        attributes: Value,
    ) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id,
            name: name.map(str::to_string),
            price_text: price_text.map(str::to_string),
            attributes_json: Some(Value::Object(attributes.clone()).to_string()),
            attributes,
        }
    }
}

fn parse_attributes(id: i64, payload: Option<&str>) -> Map<String, Value> {
    let Some(payload) = payload.filter(|p| !p.trim().is_empty()) else {
        return Map::new();
    };

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(other) => {
            warn!(
                "Listing {}: attributes payload is not an object (found {}), ignoring it",
                id,
                json_kind(&other)
            );
            Map::new()
        }
        Err(e) => {
            warn!("Listing {}: malformed attributes payload: {}", id, e);
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
