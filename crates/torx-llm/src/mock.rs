//! Scripted batch service for deterministic testing
//!
//! Returns pre-configured responses without making any network calls.

use crate::LlmError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use torx_domain::traits::BatchService;
use torx_domain::{BatchId, BatchJob, BatchStatus, FileId};

/// One scripted answer to `retrieve_batch`
#[derive(Debug, Clone)]
enum Scripted {
    Job(BatchJob),
    Error(String),
}

#[derive(Debug, Default)]
struct MockState {
    statuses: VecDeque<Scripted>,
    files: HashMap<String, String>,
    uploads: Vec<(String, Vec<u8>)>,
    upload_error: Option<String>,
    create_error: Option<String>,
    create_count: usize,
    retrieve_count: usize,
    content_count: usize,
}

/// Mock batch service
///
/// `retrieve_batch` answers from a queue filled with [`push_status`] and
/// [`push_error`]; once the queue holds a single entry it keeps repeating it.
/// All clones share state, so a test can keep a handle for assertions.
///
/// [`push_status`]: MockBatchService::push_status
/// [`push_error`]: MockBatchService::push_error
///
/// # Examples
///
/// ```
/// use torx_llm::MockBatchService;
/// use torx_domain::{BatchId, BatchJob, BatchStatus, FileId};
///
/// let service = MockBatchService::new();
/// service.push_status(BatchJob::new(BatchId::new("b"), BatchStatus::InProgress));
/// service.add_file(FileId::new("file-out"), "{}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBatchService {
    state: Arc<Mutex<MockState>>,
}

impl MockBatchService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a status snapshot for `retrieve_batch`
    pub fn push_status(&self, job: BatchJob) {
        self.state().statuses.push_back(Scripted::Job(job));
    }

    /// Queue a transient failure for `retrieve_batch`
    pub fn push_error(&self, message: impl Into<String>) {
        self.state()
            .statuses
            .push_back(Scripted::Error(message.into()));
    }

    /// Register downloadable file content
    pub fn add_file(&self, id: FileId, content: impl Into<String>) {
        self.state()
            .files
            .insert(id.as_str().to_string(), content.into());
    }

    /// Make every upload fail
    pub fn fail_uploads(&self, message: impl Into<String>) {
        self.state().upload_error = Some(message.into());
    }

    /// Make every batch creation fail
    pub fn fail_creates(&self, message: impl Into<String>) {
        self.state().create_error = Some(message.into());
    }

    /// Files uploaded so far (name, contents)
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.state().uploads.clone()
    }

    /// Number of `create_batch` calls
    pub fn create_count(&self) -> usize {
        self.state().create_count
    }

    /// Number of `retrieve_batch` calls
    pub fn retrieve_count(&self) -> usize {
        self.state().retrieve_count
    }

    /// Number of `file_content` calls
    pub fn content_count(&self) -> usize {
        self.state().content_count
    }
}

impl BatchService for MockBatchService {
    type Error = LlmError;

    async fn upload_job_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<FileId, LlmError> {
        let mut state = self.state();
        if let Some(message) = &state.upload_error {
            return Err(LlmError::Communication(message.clone()));
        }
        state.uploads.push((file_name.to_string(), contents));
        Ok(FileId::new(format!("file-{}", state.uploads.len())))
    }

    async fn create_batch(&self, input_file: &FileId) -> Result<BatchJob, LlmError> {
        let mut state = self.state();
        state.create_count += 1;
        if let Some(message) = &state.create_error {
            return Err(LlmError::Http {
                status: 400,
                body: message.clone(),
            });
        }
        Ok(BatchJob::new(
            BatchId::new(format!("batch_{}_{}", input_file, state.create_count)),
            BatchStatus::Validating,
        ))
    }

    async fn retrieve_batch(&self, _id: &BatchId) -> Result<BatchJob, LlmError> {
        let mut state = self.state();
        state.retrieve_count += 1;

        let next = if state.statuses.len() > 1 {
            state.statuses.pop_front()
        } else {
            state.statuses.front().cloned()
        };

        match next {
            Some(Scripted::Job(job)) => Ok(job),
            Some(Scripted::Error(message)) => Err(LlmError::Communication(message)),
            None => Err(LlmError::Communication("no scripted status".to_string())),
        }
    }

    async fn file_content(&self, id: &FileId) -> Result<String, LlmError> {
        let mut state = self.state();
        state.content_count += 1;
        state.files.get(id.as_str()).cloned().ok_or_else(|| LlmError::Http {
            status: 404,
            body: format!("No such file: {}", id),
        })
    }
}
