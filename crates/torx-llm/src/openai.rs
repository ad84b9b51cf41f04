//! OpenAI batch API client
//!
//! Talks to the four endpoints the pipeline needs:
//!
//! - `POST /files` (multipart, `purpose=batch`)
//! - `POST /batches`
//! - `GET /batches/{id}`
//! - `GET /files/{id}/content`
//!
//! The client performs no retries of its own; callers decide what a failure
//! means (submission aborts, polling backs off).
//!
//! # Examples
//!
//! ```no_run
//! use torx_llm::OpenAiBatchClient;
//!
//! let client = OpenAiBatchClient::new("sk-...").unwrap();
//! ```

use crate::wire::{BatchObject, CreateBatchRequest, FileObject, BATCH_PURPOSE};
use crate::{LlmError, CHAT_COMPLETIONS_ENDPOINT, COMPLETION_WINDOW};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use torx_domain::traits::BatchService;
use torx_domain::{BatchId, BatchJob, FileId};
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for a single HTTP request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Batch API client
///
/// Construct once at process start and pass by reference to every component
/// that needs it.
#[derive(Debug, Clone)]
pub struct OpenAiBatchClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBatchClient {
    /// Create a client against the default base URL
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client against a custom base URL (proxies, compatible services, tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-success statuses to errors carrying the remote payload
    async fn check(response: Response) -> Result<Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => LlmError::Unauthorized(body),
            StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded(body),
            _ => LlmError::Http {
                status: status.as_u16(),
                body,
            },
        })
    }
}

impl BatchService for OpenAiBatchClient {
    type Error = LlmError;

    async fn upload_job_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<FileId, LlmError> {
        debug!("Uploading {} ({} bytes)", file_name, contents.len());

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/jsonl")?;
        let form = Form::new().text("purpose", BATCH_PURPOSE).part("file", part);

        let response = self
            .client
            .post(self.url("/files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let file: FileObject = Self::check(response).await?.json().await?;
        Ok(FileId::new(file.id))
    }

    async fn create_batch(&self, input_file: &FileId) -> Result<BatchJob, LlmError> {
        let request = CreateBatchRequest {
            input_file_id: input_file.as_str(),
            endpoint: CHAT_COMPLETIONS_ENDPOINT,
            completion_window: COMPLETION_WINDOW,
        };

        let response = self
            .client
            .post(self.url("/batches"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let batch: BatchObject = Self::check(response).await?.json().await?;
        batch.into_job()
    }

    async fn retrieve_batch(&self, id: &BatchId) -> Result<BatchJob, LlmError> {
        let response = self
            .client
            .get(self.url(&format!("/batches/{}", id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let batch: BatchObject = Self::check(response).await?.json().await?;
        batch.into_job()
    }

    async fn file_content(&self, id: &FileId) -> Result<String, LlmError> {
        let response = self
            .client
            .get(self.url(&format!("/files/{}/content", id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(Self::check(response).await?.text().await?)
    }
}
