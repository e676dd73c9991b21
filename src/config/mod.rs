use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::Environment;
use crate::state::DEFAULT_LOG_CAPACITY;
use crate::trigger::{DEFAULT_SEQUENCE, Direction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Environment used for QuickConnect and as the PIN default.
    #[serde(default)]
    pub environment: Environment,

    /// Maximum tracing level written to the log file. Default: "info"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub status_log: StatusLogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: Environment::default(),
            log_level: default_log_level(),
            trigger: TriggerConfig::default(),
            status_log: StatusLogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Whether the hidden key combination is active. Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Direction names, in order. Default: up, up, down, down
    #[serde(default = "default_sequence")]
    pub sequence: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            enabled: true,
            sequence: default_sequence(),
        }
    }
}

impl TriggerConfig {
    /// Parse the configured direction names.
    pub fn sequence(&self) -> Result<Vec<Direction>> {
        anyhow::ensure!(!self.sequence.is_empty(), "trigger.sequence is empty");
        self.sequence
            .iter()
            .map(|name| name.parse::<Direction>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()
            .context("invalid trigger.sequence")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLogConfig {
    /// Number of status lines kept for the status view. Default: 200
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
}

impl Default for StatusLogConfig {
    fn default() -> Self {
        StatusLogConfig {
            capacity: default_log_capacity(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sequence() -> Vec<String> {
    DEFAULT_SEQUENCE
        .iter()
        .map(|d| d.as_str().to_string())
        .collect()
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

impl Config {
    /// Parse `log_level` into a tracing level, falling back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Returns the base config directory: ~/.assurance/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".assurance"))
}

/// Returns the path to config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Returns the path to the log file
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("assurance.log"))
}

/// Ensure the base directory exists
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.assurance/")?;
    Ok(())
}

/// Load config from ~/.assurance/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Write the default config to `path` unless a file is already there.
/// Returns whether a file was written.
pub fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content =
        toml::to_string_pretty(&Config::default()).context("failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
