//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline logic and its
//! infrastructure. Implementations live in other crates.

use crate::{BatchId, BatchJob, FileId, ProjectId, ProjectRecord, ProjectSummary, RecordUpdate};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Trait for storing and retrieving project records
///
/// Implemented by the infrastructure layer (torx-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// All project ids, most recently updated first
    fn list_projects(&self) -> Result<Vec<ProjectSummary>, Self::Error>;

    /// Get a record by project id
    fn get_record(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, Self::Error>;

    /// Insert or replace records keyed by project id, refreshing their timestamps
    ///
    /// Returns the number of records written.
    fn upsert_records(&mut self, records: &[RecordUpdate]) -> Result<usize, Self::Error>;
}

/// Trait for the remote batch service
///
/// Implemented by the infrastructure layer (torx-llm)
pub trait BatchService {
    /// Error type for remote operations
    type Error;

    /// Upload a job file for batch processing
    fn upload_job_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<FileId, Self::Error>>;

    /// Create a batch job over an uploaded job file
    fn create_batch(
        &self,
        input_file: &FileId,
    ) -> impl Future<Output = Result<BatchJob, Self::Error>>;

    /// Fetch the current state of a batch job
    fn retrieve_batch(&self, id: &BatchId) -> impl Future<Output = Result<BatchJob, Self::Error>>;

    /// Download the text content of a remote file
    fn file_content(&self, id: &FileId) -> impl Future<Output = Result<String, Self::Error>>;
}

/// Trait for flattening a document into plain text
///
/// Implemented by the application layer (torx-extractor)
pub trait TextSource {
    /// Error type for text extraction
    type Error;

    /// Return the full text of the document, pages separated by newlines
    fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for waiting, so polling loops can be driven without real time
///
/// Implemented by the application layer (torx-tracker)
pub trait Clock {
    /// Suspend for the given duration
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}
