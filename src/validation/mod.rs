//! Validation functionality
//!
//! Provides validation logic for:
//! - Mapping descriptors (sources, lookups, dependencies, entity, features)
//! - Identifier and source name rules

pub mod input;
pub mod mapping;

pub use input::{ValidationError, validate_identifier, validate_source_name};
pub use mapping::{MappingIssue, MappingValidationError, MappingValidator};
