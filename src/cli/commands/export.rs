//! Export command handler

use crate::cli::error::CliError;
use crate::export::PopulateExporter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub mapping: PathBuf,
    pub schema: PathBuf,
    pub output: PathBuf,
    pub force: bool,
}

/// What an export run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub entities: usize,
    pub statements: usize,
    pub digest: String,
}

/// Check if file exists and handle overwrite
pub fn check_file_overwrite(output_path: &Path, force: bool) -> Result<(), CliError> {
    if output_path.exists() && !force {
        return Err(CliError::OutputExists(output_path.to_path_buf()));
    }
    Ok(())
}

/// Write the script, creating parent directories if needed
pub fn write_export_output(output_path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::FileWriteError(
                output_path.to_path_buf(),
                format!("Failed to create directory: {}", e),
            )
        })?;
    }

    std::fs::write(output_path, content)
        .map_err(|e| CliError::FileWriteError(output_path.to_path_buf(), e.to_string()))
}

/// Generate the populate script and write it to `args.output`
pub fn run_export(args: &ExportArgs) -> Result<ExportSummary, CliError> {
    check_file_overwrite(&args.output, args.force)?;

    let exporter = PopulateExporter::from_paths(&args.mapping, &args.schema)?;
    let script = exporter.export()?;
    write_export_output(&args.output, &script.render())?;
    info!("Wrote {}", args.output.display());

    Ok(ExportSummary {
        output: args.output.clone(),
        entities: script.entities_exported,
        statements: script.statement_count(),
        digest: script.digest(),
    })
}

/// Handle the export command
pub fn handle_export(args: &ExportArgs) -> Result<(), CliError> {
    let summary = run_export(args)?;
    println!("Wrote {}", summary.output.display());
    println!(
        "Entities exported: {} ({} statements)",
        summary.entities, summary.statements
    );
    println!("SHA-256: {}", summary.digest);
    Ok(())
}
