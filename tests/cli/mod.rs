//! CLI tests module

#[cfg(feature = "cli")]
pub mod export_tests;
#[cfg(feature = "cli")]
pub mod validate_tests;
