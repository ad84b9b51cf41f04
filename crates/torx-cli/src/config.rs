//! Configuration management for the CLI.
//!
//! One TOML file carries every section:
//!
//! ```toml
//! [extract]
//! input_dir = "input_pdfs"
//! concurrency = 20
//!
//! [model]
//! name = "gpt-4o-mini"
//!
//! [batch]
//! poll_interval_secs = 120
//!
//! [storage]
//! mode = "sqlite"
//! db_path = "torx.db"
//!
//! [api]
//! base_url = "https://api.openai.com/v1"
//!
//! [settings]
//! color = true
//! format = "table"
//! ```
//!
//! The file is looked up at `--config`, then `./torx.toml`, then
//! `~/.torx/config.toml`. `OPENAI_API_KEY` and `TORX_DB` override the file.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use torx_extractor::{ExtractorConfig, ModelConfig};
use torx_llm::openai::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use torx_store::StorageConfig;
use torx_tracker::TrackerConfig;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "torx.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document scanning and extraction
    #[serde(default)]
    pub extract: ExtractorConfig,

    /// Model parameters
    #[serde(default)]
    pub model: ModelConfig,

    /// Submission and polling
    #[serde(default)]
    pub batch: TrackerConfig,

    /// Record storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Batch API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Terminal output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Batch API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (prefer the `OPENAI_API_KEY` environment variable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Path of the per-user configuration file.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".torx").join("config.toml"))
    }

    /// Load configuration and apply environment overrides.
    ///
    /// An explicit path must exist; otherwise the first existing default
    /// location is used, falling back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::default_locations().into_iter().find(|p| p.exists()),
        };

        let mut config = match &path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };

        config.apply_env(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("TORX_DB").ok(),
        );
        config.validate()?;
        Ok(config)
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        paths.extend(Self::user_path());
        paths
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Apply environment overrides; blank values are ignored.
    pub fn apply_env(&mut self, api_key: Option<String>, db_path: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(path) = db_path.filter(|p| !p.trim().is_empty()) {
            self.storage.db_path = PathBuf::from(path);
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.extract
            .validate()
            .map_err(|e| CliError::Config(format!("[extract] {}", e)))?;
        self.model
            .validate()
            .map_err(|e| CliError::Config(format!("[model] {}", e)))?;
        self.batch
            .validate()
            .map_err(|e| CliError::Config(format!("[batch] {}", e)))?;
        if self.api.base_url.trim().is_empty() {
            return Err(CliError::Config("[api] base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// API key, required by commands that talk to the batch service.
    pub fn api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CliError::Config("No API key: set OPENAI_API_KEY or [api] api_key".to_string())
            })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
