//! Configuration file parsing for the dashboard.
//!
//! Reads the `[dashboard]` and `[storage]` sections of `torx.toml`; the
//! pipeline sections are ignored.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use torx_store::StorageConfig;

/// Config file picked up from the working directory
pub const LOCAL_CONFIG_FILE: &str = "torx.toml";

/// Dashboard configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Listen address
///
/// ```toml
/// [dashboard]
/// bind_address = "127.0.0.1"
/// bind_port = 8501
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8501)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

/// Dashboard configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    /// Listen address
    #[serde(default)]
    pub dashboard: ServerConfig,

    /// Where project records are read from
    #[serde(default)]
    pub storage: StorageConfig,
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, else `./torx.toml` when present, else defaults
    ///
    /// `TORX_DB` overrides the SQLite path afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(LOCAL_CONFIG_FILE).exists() => Self::from_file(LOCAL_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(std::env::var_os("TORX_DB").map(PathBuf::from));
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, db_path: Option<PathBuf>) {
        if let Some(db_path) = db_path {
            self.storage.db_path = db_path;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "[dashboard] bind_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.dashboard.bind_address, self.dashboard.bind_port)
    }
}
