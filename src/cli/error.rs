//! CLI-specific error types

use crate::export::ExportError;
use crate::models::MappingError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Output file exists: {0}. Use --force to overwrite.")]
    OutputExists(PathBuf),

    #[error("Invalid config: {0}")]
    ConfigError(String),

    #[error("Mapping error: {0}")]
    MappingError(#[from] MappingError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
}
