//! Remote batch job model

use std::fmt;
use std::str::FromStr;

/// Identifier of a remote batch job
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchId(String);

impl BatchId {
    /// Wrap a remote batch identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a file held by the remote batch service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    /// Wrap a remote file identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a remote batch job
///
/// | Status | Kind |
/// |--------|------|
/// | `validating`, `in_progress`, `finalizing`, `cancelling` | pending |
/// | `completed` | terminal success |
/// | `failed`, `expired`, `cancelled` | terminal failure |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchStatus {
    /// Input file is being validated
    Validating,
    /// Requests are being processed
    InProgress,
    /// Output file is being prepared
    Finalizing,
    /// Cancellation requested but not yet effective
    Cancelling,
    /// Finished; output file is available
    Completed,
    /// Validation or processing failed
    Failed,
    /// Completion window elapsed
    Expired,
    /// Cancelled
    Cancelled,
}

impl BatchStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Validating => "validating",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Finalizing => "finalizing",
            BatchStatus::Cancelling => "cancelling",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Expired => "expired",
            BatchStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the job can still change state
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            BatchStatus::Validating
                | BatchStatus::InProgress
                | BatchStatus::Finalizing
                | BatchStatus::Cancelling
        )
    }

    /// Whether the job has reached a final state
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Whether the job ended without usable output
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BatchStatus::Failed | BatchStatus::Expired | BatchStatus::Cancelled
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string the remote service sent that this crate does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown batch status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for BatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validating" => Ok(BatchStatus::Validating),
            "in_progress" => Ok(BatchStatus::InProgress),
            "finalizing" => Ok(BatchStatus::Finalizing),
            "cancelling" => Ok(BatchStatus::Cancelling),
            "completed" => Ok(BatchStatus::Completed),
            "failed" => Ok(BatchStatus::Failed),
            "expired" => Ok(BatchStatus::Expired),
            "cancelled" => Ok(BatchStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Per-request progress reported by the remote service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    /// Requests in the job file
    pub total: u64,
    /// Requests that produced a response
    pub completed: u64,
    /// Requests that errored
    pub failed: u64,
}

/// Snapshot of a remote batch job
///
/// Created by submission and mutated only by the remote service; the local
/// side only observes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Remote handle
    pub id: BatchId,
    /// Current status
    pub status: BatchStatus,
    /// Output file (set once completed)
    pub output_file_id: Option<FileId>,
    /// Per-request error file, when some requests failed
    pub error_file_id: Option<FileId>,
    /// Job-level error messages reported by the service
    pub errors: Vec<String>,
    /// Request progress, when reported
    pub request_counts: Option<RequestCounts>,
}

impl BatchJob {
    /// Minimal job snapshot with only an id and status
    pub fn new(id: BatchId, status: BatchStatus) -> Self {
        Self {
            id,
            status,
            output_file_id: None,
            error_file_id: None,
            errors: Vec::new(),
            request_counts: None,
        }
    }

    /// Attach an output file reference
    pub fn with_output(mut self, file_id: FileId) -> Self {
        self.output_file_id = Some(file_id);
        self
    }

    /// Attach a job-level error message
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BatchStatus; 8] = [
        BatchStatus::Validating,
        BatchStatus::InProgress,
        BatchStatus::Finalizing,
        BatchStatus::Cancelling,
        BatchStatus::Completed,
        BatchStatus::Failed,
        BatchStatus::Expired,
        BatchStatus::Cancelled,
    ];

    #[test]
    fn test_status_wire_names_parse_back() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<BatchStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_pending_and_terminal_partition() {
        for status in ALL {
            assert_ne!(status.is_pending(), status.is_terminal());
        }
        assert!(BatchStatus::Completed.is_terminal());
        assert!(!BatchStatus::Completed.is_failure());
        assert!(BatchStatus::Expired.is_failure());
        assert!(BatchStatus::Cancelling.is_pending());
    }

    #[test]
    fn test_unknown_status() {
        let err = "paused".parse::<BatchStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("paused".to_string()));
        assert!(err.to_string().contains("paused"));
    }

    #[test]
    fn test_job_builders() {
        let job = BatchJob::new(BatchId::new("batch_1"), BatchStatus::Failed)
            .with_error("bad line 3");
        assert_eq!(job.errors, vec!["bad line 3".to_string()]);
        assert!(job.output_file_id.is_none());
    }
}
