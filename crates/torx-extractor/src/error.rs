//! Error types for job building

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing a job file
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input folder does not exist
    #[error("Input folder not found: {0}")]
    InputFolderMissing(PathBuf),

    /// Input folder holds no matching documents
    #[error("No .{extension} documents in {folder}")]
    NoDocuments {
        /// Folder that was scanned
        folder: PathBuf,
        /// Extension filter
        extension: String,
    },

    /// Every document was skipped or missed; there is nothing to submit
    #[error("No new work to submit")]
    NoWork,

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker pool error
    #[error("Worker error: {0}")]
    Worker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
