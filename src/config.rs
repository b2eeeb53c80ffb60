use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fingerprint::FingerprintOptions;

const CONFIG_FILE: &str = "config.toml";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "doctree";
const APP_NAME: &str = "doctree";

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "DOCTREE_DATA_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Give up fingerprinting after this many seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Mix file modification times into the fingerprint
    #[serde(default)]
    pub include_mtime: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            include_mtime: false,
        }
    }
}

impl FingerprintConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn options(&self) -> FingerprintOptions {
        FingerprintOptions {
            include_mtime: self.include_mtime,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Level for the file log
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative paths are resolved against the data directory)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Rotation strategy: minutely, hourly, daily or never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// Log file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            rotation: default_rotation(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_file_prefix() -> String {
    "doctree.log".to_string()
}

impl Config {
    /// Load configuration from `<data_dir>/config.toml`, or defaults if absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = Self::config_path(data_dir);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `<data_dir>/config.toml`.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let config_path = Self::config_path(data_dir);

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }
}

/// Resolve the data directory.
///
/// Priority: explicit override, then `DOCTREE_DATA_DIR`, then the
/// platform data directory (`~/.local/share/doctree` on Linux).
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    default_data_dir()
}

/// Platform data directory for doctree.
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Default project name: the name of the current working directory.
pub fn default_project_name() -> String {
    std::env::current_dir()
        .ok()
        .as_deref()
        .and_then(project_name_for)
        .unwrap_or_else(|| "default".to_string())
}

fn project_name_for(dir: &Path) -> Option<String> {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.trim().is_empty())
}
