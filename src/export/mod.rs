//! Export functionality
//!
//! Provides:
//! - SQL statement model (inserts, key subqueries, quoting)
//! - Populate script assembly
//! - Path-based export of a mapping, schema and raw stores

pub mod populate;
pub mod script;
pub mod sql;

use crate::models::MappingError;
use crate::store::StoreError;
use crate::validation::mapping::MappingValidationError;
use std::path::PathBuf;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A required input file (mapping or schema) does not exist
    #[error("Missing {kind} file: {}", path.display())]
    MissingArtifact { kind: &'static str, path: PathBuf },

    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Validation(#[from] MappingValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

// Re-export for convenience
pub use populate::PopulateExporter;
pub use script::{COMMIT_MARKER, PopulateScript};
pub use sql::{InsertStatement, KeyLookup, SqlExpr, SqlValue, quote_identifier, quote_literal};
