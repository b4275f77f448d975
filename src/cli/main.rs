//! CLI binary entry point for listing-normalizer

use clap::{Parser, Subcommand};
use listing_normalizer::cli::CliConfig;
use listing_normalizer::cli::commands::export::{ExportArgs, handle_export};
use listing_normalizer::cli::commands::validate::handle_validate;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "listing-normalizer")]
#[command(about = "Generate an idempotent populate script from scraped listing stores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the populate script
    Export {
        /// Mapping descriptor (JSON or YAML)
        #[arg(short, long)]
        mapping: Option<PathBuf>,
        /// Schema file copied to the head of the script
        #[arg(short, long)]
        schema: Option<PathBuf>,
        /// Populate script to write
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
    /// Validate a mapping descriptor
    Validate {
        /// Mapping descriptor (JSON or YAML)
        #[arg(short, long)]
        mapping: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = CliConfig::load(&PathBuf::from(".")).and_then(|config| match cli.command {
        Commands::Export {
            mapping,
            schema,
            output,
            force,
        } => {
            let paths = config.with_flags(mapping, schema, output).paths;
            let args = ExportArgs {
                mapping: paths.mapping,
                schema: paths.schema,
                output: paths.output,
                force,
            };
            handle_export(&args)
        }
        Commands::Validate { mapping } => {
            let paths = config.with_flags(mapping, None, None).paths;
            handle_validate(&paths.mapping)
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
