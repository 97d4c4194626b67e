//! Command line configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use pwlink_core::command::PW_LINK_COMMAND;

/// pwlink configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Linking tool settings
    #[serde(default)]
    pub tool: ToolConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Linking tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool binary, looked up in `PATH` unless absolute
    #[serde(default = "default_command")]
    pub command: String,
    /// Kill the tool after this many milliseconds (no limit if unset)
    pub timeout_ms: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { command: default_command(), timeout_ms: None }
    }
}

impl ToolConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn default_command() -> String {
    PW_LINK_COMMAND.to_string()
}

/// Load configuration from the default location, or defaults.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Load configuration from `path`, or defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;
        Ok(config)
    } else {
        info!(config_path = ?path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "pwlink", "pwlink")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}
