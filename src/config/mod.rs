//! Configuration management for archivist.
//!
//! Configuration is read from `~/.config/archivist/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregator::DEFAULT_ROWS;
use crate::fetcher::download::DOWNLOAD_USER_AGENT;
use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::fetcher::DEFAULT_BASE_URL;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveSettings,
    pub download: DownloadSettings,
}

/// Where and how the archive service is queried.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub base_url: String,
    /// Rows requested per search or category page.
    pub rows: u32,
    /// Request timeout; unset leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            rows: DEFAULT_ROWS,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Target directory; unset means the platform download directory.
    pub directory: Option<PathBuf>,
    pub workers: usize,
    pub user_agent: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            directory: None,
            workers: DEFAULT_WORKERS,
            user_agent: DOWNLOAD_USER_AGENT.to_string(),
        }
    }
}

impl DownloadSettings {
    pub fn resolve_directory(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .ok_or(ConfigError::NoDownloadDir)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/archivist/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("archivist").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# archivist configuration

[archive]
# Base URL of the archive service
base_url = "https://archive.org/"

# Rows requested per search or category page
rows = 50

# Request timeout in seconds (unset = no explicit timeout)
# timeout_secs = 30

[download]
# Where files are saved (unset = your Downloads directory)
# directory = "/path/to/downloads"

# Maximum concurrent file downloads
workers = 4

# User agent sent with file downloads
user_agent = "Mozilla/5.0"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine download directory")]
    NoDownloadDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
