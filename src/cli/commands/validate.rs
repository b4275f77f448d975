//! Validate command implementation

use crate::cli::error::CliError;
use crate::models::Mapping;
use std::path::Path;

/// Shape of a validated mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSummary {
    pub sources: usize,
    pub lookups: usize,
    pub dependent_lookups: usize,
    pub columns: usize,
    pub features: bool,
}

impl MappingSummary {
    pub fn of(mapping: &Mapping) -> Self {
        Self {
            sources: mapping.sources.len(),
            lookups: mapping.normalize.len(),
            dependent_lookups: mapping
                .normalize
                .iter()
                .filter(|l| l.depends_on.is_some())
                .count(),
            columns: mapping.car.columns.len(),
            features: mapping.features.is_some(),
        }
    }
}

/// Load and validate a mapping file
pub fn run_validate(mapping_path: &Path) -> Result<MappingSummary, CliError> {
    if !mapping_path.exists() {
        return Err(CliError::FileNotFound(mapping_path.to_path_buf()));
    }
    let mapping = Mapping::load(mapping_path)?;
    Ok(MappingSummary::of(&mapping))
}

/// Handle the validate command
pub fn handle_validate(mapping_path: &Path) -> Result<(), CliError> {
    let summary = run_validate(mapping_path)?;

    println!("Validation successful");
    println!("  Sources: {}", summary.sources);
    println!(
        "  Lookups: {} ({} dependent)",
        summary.lookups, summary.dependent_lookups
    );
    println!("  Entity columns: {}", summary.columns);
    println!(
        "  Features: {}",
        if summary.features { "enabled" } else { "disabled" }
    );
    Ok(())
}
