//! Mapping descriptor
//!
//! Describes which sources to read, which lookup (dimension) tables to
//! normalize values into, how the central entity row is assembled and,
//! optionally, how a multi-valued field is expanded into a feature link table.
//!
//! Mapping documents are JSON (the historical format) or YAML. Unknown keys
//! are ignored; missing required keys are a load error.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::field::{FieldSpec, ValueType};
use crate::validation::mapping::{MappingValidationError, MappingValidator};

/// Default surrogate key column of every generated table
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Default table holding raw listings inside a source database
pub const DEFAULT_LISTING_TABLE: &str = "listings";

/// Error loading a mapping document
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The document could not be read
    #[error("Failed to read mapping {path}: {message}")]
    Io { path: String, message: String },

    /// The document is not a well-formed mapping object
    #[error("Failed to parse mapping: {0}")]
    Parse(String),

    /// The document parsed but describes an unusable mapping
    #[error(transparent)]
    Invalid(#[from] MappingValidationError),
}

/// Result type for mapping loading
pub type MappingResult<T> = Result<T, MappingError>;

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

fn default_listing_table() -> String {
    DEFAULT_LISTING_TABLE.to_string()
}

/// One origin of raw records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source name, embedded in every entity row's natural key
    pub name: String,
    /// Handle of the raw store (a database path relative to the mapping file)
    pub db: String,
    /// Table holding the raw listings
    #[serde(default = "default_listing_table")]
    pub table: String,
}

/// Reference from a dependent lookup to its parent lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupDependency {
    /// `car_fk` of the parent lookup
    pub car_fk: String,
    /// Column of the child table referencing the parent row (defaults to the parent's `car_fk`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Parent table, checked against the referenced lookup when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Parent value column, checked against the referenced lookup when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_column: Option<String>,
}

/// A lookup (dimension) table normalizing one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupDescriptor {
    pub table: String,
    pub value_column: String,
    /// Columns of the table's uniqueness constraint
    #[serde(alias = "unique_columns")]
    pub unique: Vec<String>,
    /// Where the lookup value comes from
    pub from: FieldSpec,
    /// Foreign key column on the entity table, also the lookup's identity in the mapping
    #[serde(alias = "car_fk_column")]
    pub car_fk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<LookupDependency>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

/// One typed column of the entity row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityColumn {
    pub column: String,
    pub from: FieldSpec,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// The central entity table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub table: String,
    /// Columns identifying a row across runs (source name + source-local id)
    pub natural_key: Vec<String>,
    pub columns: Vec<EntityColumn>,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

impl EntityDescriptor {
    /// Find a declared column by name
    pub fn column(&self, name: &str) -> Option<&EntityColumn> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Many-to-many expansion of a multi-valued field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Field expected to resolve to a list of strings
    pub from: FieldSpec,
    pub feature_table: String,
    pub feature_value_column: String,
    #[serde(alias = "feature_unique_columns")]
    pub feature_unique: Vec<String>,
    pub link_table: String,
    #[serde(alias = "link_entity_fk_column")]
    pub link_car_fk: String,
    #[serde(alias = "link_feature_fk_column")]
    pub link_feature_fk: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

/// Complete mapping document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub sources: Vec<Source>,
    /// Lookups in declaration order; parents precede their children
    #[serde(default, alias = "lookups")]
    pub normalize: Vec<LookupDescriptor>,
    /// The entity table (named `car` for historical reasons)
    #[serde(alias = "entity")]
    pub car: EntityDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureDescriptor>,
}

impl Mapping {
    /// Parse a mapping from JSON without validating it
    pub fn from_json(content: &str) -> MappingResult<Self> {
        serde_json::from_str(content).map_err(|e| MappingError::Parse(e.to_string()))
    }

    /// Parse a mapping from YAML without validating it
    pub fn from_yaml(content: &str) -> MappingResult<Self> {
        serde_yaml::from_str(content).map_err(|e| MappingError::Parse(e.to_string()))
    }

    /// Load and validate a mapping document.
    ///
    /// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
    pub fn load(path: &Path) -> MappingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MappingError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let mapping = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Run all semantic checks against this mapping
    pub fn validate(&self) -> Result<(), MappingValidationError> {
        MappingValidator::new().validate(self)
    }

    /// Position of the lookup identified by `car_fk`
    pub fn lookup_index(&self, car_fk: &str) -> Option<usize> {
        self.normalize.iter().position(|l| l.car_fk == car_fk)
    }
}
