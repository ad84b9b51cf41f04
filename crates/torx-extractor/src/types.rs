//! Job build results

use std::path::PathBuf;
use torx_llm::BatchRequestLine;

/// Requests produced from a set of documents
#[derive(Debug, Clone, Default)]
pub struct RequestBatch {
    /// One request per document with a section, ordered by file name
    pub requests: Vec<BatchRequestLine>,

    /// Documents left out because their project is already stored
    pub skipped_existing: usize,

    /// Documents whose section could not be extracted
    pub extraction_failed: usize,

    /// File names of the documents counted in `extraction_failed`
    pub missing_sections: Vec<String>,
}

impl RequestBatch {
    /// Number of requests ready for submission
    pub fn queued(&self) -> usize {
        self.requests.len()
    }
}

/// Outcome of a full job build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobBuildReport {
    /// Documents found in the input folder
    pub scanned: usize,

    /// Documents left out because their project is already stored
    pub skipped_existing: usize,

    /// Documents whose section could not be extracted
    pub extraction_failed: usize,

    /// Requests written to the job file
    pub queued: usize,

    /// File names of the documents counted in `extraction_failed`
    pub missing_sections: Vec<String>,

    /// Job file path, `None` when there was no work
    pub job_file: Option<PathBuf>,
}

impl JobBuildReport {
    /// Whether a job file was written
    pub fn has_work(&self) -> bool {
        self.job_file.is_some()
    }

    /// One-line summary for logs and terminal output
    pub fn summary(&self) -> String {
        format!(
            "{} scanned, {} skipped (already stored), {} without section, {} queued",
            self.scanned, self.skipped_existing, self.extraction_failed, self.queued
        )
    }
}
