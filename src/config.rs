use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{limits, team};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub search: SearchConfig,

    pub team: TeamConfig,

    pub dictionaries: DictionaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" (default) or "json"
    pub log_format: String,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/showtrack.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) return nothing.
    pub min_query_length: usize,

    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: limits::MIN_SEARCH_QUERY_LEN,
            max_results: limits::MAX_SEARCH_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    /// Key creatives text for a show without team members.
    pub empty_sentinel: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            empty_sentinel: team::EMPTY_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Fill empty studio/role tables from the built-in lists at startup.
    pub seed_builtin: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self { seed_builtin: true }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("showtrack").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".showtrack").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_length < limits::MIN_SEARCH_QUERY_LEN {
            anyhow::bail!(
                "search.min_query_length must be at least {}",
                limits::MIN_SEARCH_QUERY_LEN
            );
        }

        if self.search.max_results == 0 || self.search.max_results > limits::MAX_SEARCH_RESULTS {
            anyhow::bail!(
                "search.max_results must be between 1 and {}",
                limits::MAX_SEARCH_RESULTS
            );
        }

        if self.team.empty_sentinel.trim().is_empty() {
            anyhow::bail!("team.empty_sentinel cannot be blank");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}
