//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Job building error
    #[error(transparent)]
    Extractor(#[from] torx_extractor::ExtractorError),

    /// Submission, polling, or reconciliation error
    #[error(transparent)]
    Tracker(#[from] torx_tracker::TrackerError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] torx_store::StoreError),

    /// Batch API client error
    #[error("Batch API error: {0}")]
    Llm(#[from] torx_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Project not found in storage
    #[error("Project not found: {0}")]
    NotFound(String),
}
