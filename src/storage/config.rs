//! Configuration handling
//!
//! Global configuration lives in `config.toml` under the platform
//! config directory (e.g. `~/.config/tally/`). The only setting today
//! is the backing task file; the store itself never resolves paths,
//! it is handed one explicitly.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Backing task file; absent means the platform data directory
    pub tasks_file: Option<PathBuf>,
}

impl Config {
    /// Returns the global config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tally", "tally").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads the global configuration; a missing file means defaults
    pub fn load() -> Result<Self> {
        let config_dir = match Self::config_dir() {
            Some(dir) => dir,
            None => return Ok(Self::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")
    }

    /// Default task file location when nothing is configured
    pub fn default_tasks_file() -> PathBuf {
        ProjectDirs::from("dev", "tally", "tally")
            .map(|dirs| dirs.data_dir().join("tasks.json"))
            .unwrap_or_else(|| PathBuf::from("tasks.json"))
    }

    /// Resolves the backing file: explicit override (flag or env) wins,
    /// then the config file, then the platform default
    pub fn resolve_tasks_file(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path
            .or_else(|| self.tasks_file.clone())
            .unwrap_or_else(Self::default_tasks_file)
    }
}
