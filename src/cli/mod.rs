//! Command line interface
//!
//! Command handlers, CLI errors and the `.listing-normalizer.toml` wiring
//! config. The binary entry point lives in `main.rs`.

pub mod commands;
pub mod config;
pub mod error;

pub use config::CliConfig;
pub use error::CliError;
