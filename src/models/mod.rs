//! Models for the normalization engine
//!
//! Mapping descriptors (what to normalize and where it goes) and the raw
//! records read from each source.

pub mod field;
pub mod mapping;
pub mod record;

pub use field::{FieldSpec, ParseFieldSpecError, ValueType};
pub use mapping::{
    EntityColumn, EntityDescriptor, FeatureDescriptor, LookupDependency, LookupDescriptor,
    Mapping, MappingError, MappingResult, Source,
};
pub use record::{RawRecord, RawRow};
