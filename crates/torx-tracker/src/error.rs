//! Error types for batch tracking

use std::path::PathBuf;
use thiserror::Error;
use torx_domain::{BatchId, BatchStatus};

/// Errors that can occur while submitting, polling, or reconciling a batch
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Upload or batch creation failed; nothing was retried
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Batch was created but its id could not be written to the recovery file
    #[error("Batch {batch_id} created but recovery file not written: {reason}")]
    RecoveryWrite {
        /// Handle of the batch that was created
        batch_id: BatchId,
        /// Underlying failure
        reason: String,
    },

    /// No batch id recorded in the recovery file
    #[error("No batch id recorded in {0}")]
    NoRecoveredBatch(PathBuf),

    /// Remote query failed
    #[error("Remote error: {0}")]
    Remote(String),

    /// Batch reached a terminal failure status
    #[error("Batch {batch_id} ended as {status}: {detail}")]
    JobFailed {
        /// Batch handle
        batch_id: BatchId,
        /// Terminal status
        status: BatchStatus,
        /// Remote error detail
        detail: String,
    },

    /// Completed batch has no output file
    #[error("Batch {0} completed without an output file")]
    MissingOutput(BatchId),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
