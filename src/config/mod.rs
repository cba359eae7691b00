//! Configuration loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Broker hostname or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// MQTT keep-alive interval in seconds.
    pub keepalive_secs: u64,
    /// Delay before retrying after a connection error, in seconds.
    pub reconnect_delay_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "10.23.58.26".to_string(),
            port: 1183,
            keepalive_secs: 60,
            reconnect_delay_secs: 10,
        }
    }
}

/// Full supervisor configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CamsupConfig {
    /// Broker connection settings.
    pub broker: BrokerConfig,
    /// Channel names a running instance may be asked to manage.
    pub channels: Vec<String>,
}

impl Default for CamsupConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            channels: vec!["claw".to_string(), "cargo".to_string()],
        }
    }
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .camsup.toml
        search_paths.push(PathBuf::from(".camsup.toml"));

        // 2. User config directory: ~/.config/camsup/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("camsup").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<CamsupConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(CamsupConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<CamsupConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
