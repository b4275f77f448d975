//! CLI configuration file support
//!
//! Handles parsing of `.listing-normalizer.toml` and environment variable
//! overrides. Command line flags take precedence over both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::CliError;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".listing-normalizer.toml";

/// Environment variable for the mapping descriptor path
pub const ENV_MAPPING: &str = "LISTING_NORMALIZER_MAPPING";

/// Environment variable for the schema preamble path
pub const ENV_SCHEMA: &str = "LISTING_NORMALIZER_SCHEMA";

/// Environment variable for the populate script path
pub const ENV_OUTPUT: &str = "LISTING_NORMALIZER_OUTPUT";

pub const DEFAULT_MAPPING: &str = "mapping.json";
pub const DEFAULT_SCHEMA: &str = "schema.sql";
pub const DEFAULT_OUTPUT: &str = "populate.sql";

fn default_mapping() -> PathBuf {
    PathBuf::from(DEFAULT_MAPPING)
}

fn default_schema() -> PathBuf {
    PathBuf::from(DEFAULT_SCHEMA)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

/// Input and output paths of an export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_mapping")]
    pub mapping: PathBuf,

    #[serde(default = "default_schema")]
    pub schema: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            mapping: default_mapping(),
            schema: default_schema(),
            output: default_output(),
        }
    }
}

/// Represents the `.listing-normalizer.toml` configuration file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub paths: PathsSection,
}

impl CliConfig {
    /// Load configuration from a working directory
    ///
    /// Falls back to defaults if no config file exists, then applies
    /// environment overrides.
    pub fn load(dir: &Path) -> Result<Self, CliError> {
        let mut config = Self::read(dir)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read the config file alone, without environment overrides
    pub fn read(dir: &Path) -> Result<Self, CliError> {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| CliError::FileReadError(config_path.clone(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, CliError> {
        toml::from_str(content)
            .map_err(|e| CliError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key/value lookup
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MAPPING) {
            self.paths.mapping = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_SCHEMA) {
            self.paths.schema = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_OUTPUT) {
            self.paths.output = PathBuf::from(path);
        }
    }

    /// Override paths given on the command line
    pub fn with_flags(
        mut self,
        mapping: Option<PathBuf>,
        schema: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        if let Some(mapping) = mapping {
            self.paths.mapping = mapping;
        }
        if let Some(schema) = schema {
            self.paths.schema = schema;
        }
        if let Some(output) = output {
            self.paths.output = output;
        }
        self
    }
}
