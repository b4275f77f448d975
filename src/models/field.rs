//! Field specifiers and semantic value types used by mapping descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix addressing a fixed column of the raw listing row.
pub const RAW_COLUMN_PREFIX: &str = "sqlite:";

/// Prefix addressing a key of the record's attribute bag.
pub const ATTRIBUTE_PREFIX: &str = "attr:";

/// Literal specifier resolving to the name of the source being processed.
pub const SOURCE_NAME_LITERAL: &str = "source_name";

/// Where a mapped value comes from.
///
/// Serialized as the compact string forms used in mapping documents:
/// `source_name`, `sqlite:<column>` and `attr:<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldSpec {
    /// The name of the source the record was read from
    SourceName,
    /// A fixed field of the raw row (`id`, `name`, `price`, `attributes_json`)
    RawColumn(String),
    /// A key of the record's attribute bag
    Attribute(String),
}

impl FieldSpec {
    /// True when this specifier addresses the raw `id` column.
    pub fn is_raw_id(&self) -> bool {
        matches!(self, FieldSpec::RawColumn(key) if key == "id")
    }
}

/// Error raised for a field specifier string with an unknown shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field specifier '{0}': expected 'source_name', 'sqlite:<column>' or 'attr:<key>'")]
pub struct ParseFieldSpecError(pub String);

impl FromStr for FieldSpec {
    type Err = ParseFieldSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SOURCE_NAME_LITERAL {
            return Ok(FieldSpec::SourceName);
        }
        if let Some(key) = s.strip_prefix(RAW_COLUMN_PREFIX)
            && !key.is_empty()
        {
            return Ok(FieldSpec::RawColumn(key.to_string()));
        }
        if let Some(key) = s.strip_prefix(ATTRIBUTE_PREFIX)
            && !key.is_empty()
        {
            return Ok(FieldSpec::Attribute(key.to_string()));
        }
        Err(ParseFieldSpecError(s.to_string()))
    }
}

impl TryFrom<String> for FieldSpec {
    type Error = ParseFieldSpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldSpec> for String {
    fn from(spec: FieldSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::SourceName => f.write_str(SOURCE_NAME_LITERAL),
            FieldSpec::RawColumn(key) => write!(f, "{}{}", RAW_COLUMN_PREFIX, key),
            FieldSpec::Attribute(key) => write!(f, "{}{}", ATTRIBUTE_PREFIX, key),
        }
    }
}

/// Semantic type a resolved value is coerced into before emission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueType {
    /// Free text, trimmed, empty becomes NULL
    #[default]
    #[serde(rename = "text", alias = "str", alias = "string")]
    Text,
    /// Integer, digits extracted from strings
    #[serde(rename = "integer", alias = "int")]
    Integer,
    /// Integer price with currency noise removed (`"123.450 kr."` -> 123450)
    #[serde(rename = "currency_integer", alias = "int_dkk")]
    CurrencyInteger,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::CurrencyInteger => write!(f, "currency_integer"),
        }
    }
}
