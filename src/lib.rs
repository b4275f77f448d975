//! Listing Normalizer - turns scraped listing stores into an idempotent
//! populate script for a normalized relational schema
//!
//! Provides:
//! - Mapping descriptor loading and validation
//! - Field resolution and value casting
//! - Lookup, entity and feature-link materialization
//! - Populate script rendering
//! - Raw listing stores (in-memory, SQLite)

#[cfg(feature = "cli")]
pub mod cli;
pub mod export;
pub mod models;
pub mod normalize;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use export::{ExportError, ExportResult, PopulateExporter, PopulateScript};
pub use models::{
    EntityColumn, EntityDescriptor, FeatureDescriptor, FieldSpec, LookupDependency,
    LookupDescriptor, Mapping, MappingError, RawRecord, RawRow, Source, ValueType,
};
pub use normalize::Normalizer;
#[cfg(feature = "sqlite")]
pub use store::SqliteStoreProvider;
pub use store::{MemoryStoreProvider, RawStore, StoreError, StoreProvider};
pub use validation::{MappingIssue, MappingValidationError, MappingValidator};
