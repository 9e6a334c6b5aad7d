//! Configuration loading and setting resolution
//!
//! Collector settings live on the collector instance ([`CollectorConfig`]).
//! Tool settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default suffix appended to a field name to form its derived key
pub const DEFAULT_SUFFIX: &str = "_data";

/// Default identifier column for database-backed fetchers
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "TANKER_DATABASE";

/// Environment variable overriding the suffix
pub const ENV_SUFFIX: &str = "TANKER_SUFFIX";

/// Per-collector configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Appended to every field name to build the derived key; kept across flushes
    pub suffix: String,
    /// Attributes to restrict the next fetch to; cleared by every flush
    pub projection: Option<Vec<String>>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            projection: None,
        }
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(Error::Config("suffix must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// SQLite database file holding the referenced records
    pub database: Option<PathBuf>,
    /// Table the identifiers point into
    pub table: Option<String>,
    /// Identifier column in `table`
    pub id_column: Option<String>,
    /// Suffix for derived keys
    pub suffix: Option<String>,
    /// Log level for the command-line tool (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file that must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the explicit file if given, otherwise the platform default location
    ///
    /// A missing default file is not an error: compiled defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config file: {}", path.display());
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                info!("Loading config file: {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                warn!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file location: `<config_dir>/tanker/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tanker").join("config.toml"))
}

/// Resolve the database path: CLI, then `TANKER_DATABASE`, then config file
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ENV_DATABASE) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database {
        return Ok(path.clone());
    }

    // No compiled default makes sense for a database path
    Err(Error::Config(format!(
        "No database given (use --database, {} or the config file)",
        ENV_DATABASE
    )))
}

/// Resolve the suffix: CLI, then `TANKER_SUFFIX`, then config file, then `_data`
pub fn resolve_suffix(cli_arg: Option<&str>, config: &TomlConfig) -> String {
    if let Some(suffix) = cli_arg {
        return suffix.to_string();
    }

    if let Ok(suffix) = std::env::var(ENV_SUFFIX) {
        if !suffix.is_empty() {
            return suffix;
        }
    }

    config
        .suffix
        .clone()
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}
