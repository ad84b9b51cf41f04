//! Job file submission

use crate::error::TrackerError;
use crate::recovery::RecoveryFile;
use std::fmt::Display;
use std::path::Path;
use torx_domain::traits::BatchService;
use torx_domain::BatchJob;
use tracing::{error, info};

/// Uploads a job file, creates the batch, and records its id
///
/// Nothing is retried; the caller re-runs with the same job file.
pub struct Submitter<'a, B> {
    service: &'a B,
    recovery: RecoveryFile,
}

impl<'a, B> Submitter<'a, B>
where
    B: BatchService,
    B::Error: Display,
{
    /// Create a submitter over a shared service client
    pub fn new(service: &'a B, recovery: RecoveryFile) -> Self {
        Self { service, recovery }
    }

    /// Submit `job_file` and return the created batch
    ///
    /// # Errors
    ///
    /// - `Io` if the job file cannot be read
    /// - `Submission` if the upload or batch creation fails
    /// - `RecoveryWrite` if the batch exists remotely but its id could not
    ///   be recorded; the error carries the id
    pub async fn submit(&self, job_file: &Path) -> Result<BatchJob, TrackerError> {
        let contents = tokio::fs::read(job_file).await?;
        let file_name = job_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("batch_input.jsonl");

        info!("Uploading {} ({} bytes)", job_file.display(), contents.len());
        let file_id = self
            .service
            .upload_job_file(file_name, contents)
            .await
            .map_err(|e| TrackerError::Submission(format!("upload failed: {}", e)))?;

        let job = self
            .service
            .create_batch(&file_id)
            .await
            .map_err(|e| TrackerError::Submission(format!("batch creation failed: {}", e)))?;
        info!("Created batch {} (status: {})", job.id, job.status);

        if let Err(e) = self.recovery.save(&job.id) {
            error!(
                "Batch {} created but could not be written to {}: {}",
                job.id,
                self.recovery.path().display(),
                e
            );
            return Err(TrackerError::RecoveryWrite {
                batch_id: job.id,
                reason: e.to_string(),
            });
        }

        Ok(job)
    }
}
