//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file used when `--db` and `ROOMCLIMATE_DB` are unset
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Print JSON on a single line
    #[serde(default)]
    pub compact_json: bool,

    /// Productivity norm filled into `config set` documents that omit one
    #[serde(default)]
    pub productivity_norm: Option<f64>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roomclimate")
            .join("config.toml")
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }
}

/// Resolve the database path from the command line, then config, then the
/// platform default.
pub fn resolve_database(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.database.clone())
        .unwrap_or_else(roomclimate_store::default_db_path)
}

/// Resolve the output format: `--json`, then `--format`, then config.
pub fn resolve_format(json: bool, format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if json {
        return OutputFormat::Json;
    }
    format.or(config.format).unwrap_or_default()
}
