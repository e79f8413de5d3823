//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`FOLIO_*`)
//! 2. Config file (`~/.folio/config.toml`)
//! 3. Defaults

use crate::core::visitors::RETENTION_DAYS;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Visitor ledger configuration.
    pub visitors: VisitorsConfig,

    /// Dashboard configuration.
    pub dashboard: DashboardConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the slot files.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_folio_home(),
        }
    }
}

/// Visitor ledger configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisitorsConfig {
    /// Number of most recent days the ledger keeps.
    pub retention_days: usize,

    /// Client agent recorded on new visit days.
    pub client_agent: String,
}

impl Default for VisitorsConfig {
    fn default() -> Self {
        Self {
            retention_days: RETENTION_DAYS,
            client_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many recent messages the summary includes.
    pub recent_limit: usize,

    /// Length of the trailing message window, in days.
    pub window_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            window_days: 7,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `FOLIO_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Get the default folio home directory.
fn default_folio_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".folio"), |h| h.join(".folio"))
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if a setting is out of range.
pub fn load_config() -> Result<Config> {
    load_config_with(&|key: &str| env::var(key).ok())
}

fn load_config_with(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path(lookup);
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", config_path.display())))?;
        config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
    }

    apply_env_overrides(&mut config, lookup);
    validate(&config)?;

    Ok(config)
}

/// Reject values the store cannot work with.
fn validate(config: &Config) -> Result<()> {
    if config.visitors.retention_days == 0 {
        return Err(Error::Config(
            "visitors.retention_days must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Get the path to the config file.
fn get_config_path(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = lookup("FOLIO_CONFIG") {
        return PathBuf::from(path);
    }

    if let Some(home) = lookup("FOLIO_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    default_folio_home().join("config.toml")
}

/// Apply environment variable overrides to config.
///
/// Unparsable numeric values are ignored.
fn apply_env_overrides(config: &mut Config, lookup: &dyn Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("FOLIO_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Some(home) = lookup("FOLIO_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Some(days) = lookup("FOLIO_RETENTION_DAYS").and_then(|v| v.parse().ok()) {
        config.visitors.retention_days = days;
    }

    if let Some(limit) = lookup("FOLIO_RECENT_LIMIT").and_then(|v| v.parse().ok()) {
        config.dashboard.recent_limit = limit;
    }

    if let Some(days) = lookup("FOLIO_WINDOW_DAYS").and_then(|v| v.parse().ok()) {
        config.dashboard.window_days = days;
    }
}
