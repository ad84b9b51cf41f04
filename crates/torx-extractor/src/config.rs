//! Configuration for job building

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of documents extracted concurrently
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Upper bound on `concurrency`, matching tokio's default blocking pool size
pub const MAX_CONCURRENCY: usize = 512;

/// Configuration for scanning and extracting documents
///
/// ```toml
/// [extract]
/// input_dir = "input_pdfs"
/// extension = "pdf"
/// concurrency = 20
/// skip_existing = true
/// job_file = "batch_input_pg.jsonl"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Folder scanned for source documents
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// File extension to pick up (case-insensitive, no dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Maximum extractions in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Skip documents whose project already has a stored record
    #[serde(default = "default_true")]
    pub skip_existing: bool,

    /// Where the newline-delimited job file is written
    #[serde(default = "default_job_file")]
    pub job_file: PathBuf,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("input_pdfs")
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_true() -> bool {
    true
}

fn default_job_file() -> PathBuf {
    PathBuf::from("batch_input_pg.jsonl")
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            extension: default_extension(),
            concurrency: default_concurrency(),
            skip_existing: true,
            job_file: default_job_file(),
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(format!("concurrency must be at most {}", MAX_CONCURRENCY));
        }
        if self.extension.trim().is_empty() {
            return Err("extension must not be empty".to_string());
        }
        if self.job_file.as_os_str().is_empty() {
            return Err("job_file must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

/// Model parameters embedded in every request
///
/// ```toml
/// [model]
/// name = "gpt-4o-mini"
/// temperature = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub name: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("model name must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.concurrency, 20);
        assert!(config.skip_existing);
        assert_eq!(config.job_file, PathBuf::from("batch_input_pg.jsonl"));
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let config = ExtractorConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_concurrency_upper_bound() {
        let at_bound = ExtractorConfig {
            concurrency: MAX_CONCURRENCY,
            ..Default::default()
        };
        assert!(at_bound.validate().is_ok());

        let huge = ExtractorConfig {
            concurrency: usize::MAX,
            ..Default::default()
        };
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("concurrency = 4\nskip_existing = false").unwrap();
        assert_eq!(config.concurrency, 4);
        assert!(!config.skip_existing);
        assert_eq!(config.extension, "pdf");
    }

    #[test]
    fn test_model_config() {
        assert!(ModelConfig::default().validate().is_ok());
        let bad = ModelConfig {
            temperature: 3.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
