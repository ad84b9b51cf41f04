//! Configuration for batch tracking
//!
//! Defines the poll cadence, error backoff, and recovery file location.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for submission and polling
///
/// # Examples
///
/// ```
/// use torx_tracker::TrackerConfig;
///
/// let config = TrackerConfig::default();
/// assert_eq!(config.poll_interval_secs, 120);
/// assert_eq!(config.retry_backoff_secs, 60);
///
/// let config = TrackerConfig::from_toml("poll_interval_secs = 30").unwrap();
/// assert_eq!(config.poll_interval_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Wait between status checks while the batch is pending
    /// Default: 120 seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Wait after a failed status check before retrying
    /// Default: 60 seconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,

    /// File holding the last submitted batch id
    /// Default: `current_batch_id.txt`
    #[serde(default = "default_recovery_file")]
    pub recovery_file: PathBuf,
}

fn default_poll_interval() -> u64 {
    120
}

fn default_retry_backoff() -> u64 {
    60
}

fn default_recovery_file() -> PathBuf {
    PathBuf::from("current_batch_id.txt")
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            retry_backoff_secs: default_retry_backoff(),
            recovery_file: default_recovery_file(),
        }
    }
}

impl TrackerConfig {
    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be at least 1".to_string());
        }
        if self.retry_backoff_secs == 0 {
            return Err("retry_backoff_secs must be at least 1".to_string());
        }
        if self.recovery_file.as_os_str().is_empty() {
            return Err("recovery_file must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(120));
        assert_eq!(config.retry_backoff(), Duration::from_secs(60));
        assert_eq!(config.recovery_file, PathBuf::from("current_batch_id.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let config = TrackerConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml() {
        assert!(TrackerConfig::from_toml("poll_interval_secs = \"soon\"").is_err());
    }
}
