//! Wire types for the OpenAI batch API
//!
//! The shapes here are the external contract: the job-file line sent for
//! each document, the batch object returned by the service, and the result
//! line found in the output file.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use torx_domain::{BatchId, BatchJob, BatchStatus, FileId, RequestCounts};

/// Endpoint every request in a job file targets
pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/v1/chat/completions";

/// Completion window requested from the service (contractual ceiling)
pub const COMPLETION_WINDOW: &str = "24h";

/// Upload purpose for job files
pub const BATCH_PURPOSE: &str = "batch";

/// One line of a job file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequestLine {
    /// Caller-chosen identifier echoed back in the result line
    pub custom_id: String,
    /// HTTP method (always `POST`)
    pub method: String,
    /// Target endpoint
    pub url: String,
    /// Chat completion request body
    pub body: ChatCompletionBody,
}

impl BatchRequestLine {
    /// Build a chat-completion request line
    pub fn chat(custom_id: impl Into<String>, body: ChatCompletionBody) -> Self {
        Self {
            custom_id: custom_id.into(),
            method: "POST".to_string(),
            url: CHAT_COMPLETIONS_ENDPOINT.to_string(),
            body,
        }
    }

    /// Serialize as a single JSON line, keeping non-ASCII text unescaped
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Chat completion request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionBody {
    /// Model name
    pub model: String,
    /// Conversation
    pub messages: Vec<ChatMessage>,
    /// Output format constraint
    pub response_format: ResponseFormat,
    /// Sampling temperature
    pub temperature: f64,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system` or `user`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System instruction message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response format selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Format name, e.g. `json_object`
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// Force the model to answer with a JSON object
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Body of `POST /batches`
#[derive(Debug, Serialize)]
pub(crate) struct CreateBatchRequest<'a> {
    pub input_file_id: &'a str,
    pub endpoint: &'a str,
    pub completion_window: &'a str,
}

/// File object returned by `POST /files`
#[derive(Debug, Deserialize)]
pub(crate) struct FileObject {
    pub id: String,
}

/// Batch object returned by the batch endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct BatchObject {
    /// Batch id
    pub id: String,
    /// Status wire name
    pub status: String,
    /// Output file, once completed
    #[serde(default)]
    pub output_file_id: Option<String>,
    /// Error file, when some requests failed
    #[serde(default)]
    pub error_file_id: Option<String>,
    /// Job-level errors
    #[serde(default)]
    pub errors: Option<BatchErrors>,
    /// Progress counters
    #[serde(default)]
    pub request_counts: Option<WireRequestCounts>,
}

/// Error list attached to a batch object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchErrors {
    /// Individual errors
    #[serde(default)]
    pub data: Vec<BatchErrorItem>,
}

/// One job-level error
#[derive(Debug, Clone, Deserialize)]
pub struct BatchErrorItem {
    /// Machine-readable code
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
    /// Job file line the error refers to
    #[serde(default)]
    pub line: Option<u64>,
}

impl BatchErrorItem {
    fn describe(&self) -> String {
        let code = self.code.as_deref().unwrap_or("error");
        let message = self.message.as_deref().unwrap_or("no message");
        match self.line {
            Some(line) => format!("{} (line {}): {}", code, line, message),
            None => format!("{}: {}", code, message),
        }
    }
}

/// Progress counters as sent on the wire
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WireRequestCounts {
    /// Requests in the job
    #[serde(default)]
    pub total: u64,
    /// Requests that completed
    #[serde(default)]
    pub completed: u64,
    /// Requests that failed
    #[serde(default)]
    pub failed: u64,
}

impl BatchObject {
    /// Convert into the domain snapshot
    ///
    /// An unknown status string is reported as an invalid response.
    pub fn into_job(self) -> Result<BatchJob, LlmError> {
        let status: BatchStatus = self
            .status
            .parse()
            .map_err(|e| LlmError::InvalidResponse(format!("{}", e)))?;

        Ok(BatchJob {
            id: BatchId::new(self.id),
            status,
            output_file_id: self.output_file_id.map(FileId::new),
            error_file_id: self.error_file_id.map(FileId::new),
            errors: self
                .errors
                .map(|e| e.data.iter().map(BatchErrorItem::describe).collect())
                .unwrap_or_default(),
            request_counts: self.request_counts.map(|c| RequestCounts {
                total: c.total,
                completed: c.completed,
                failed: c.failed,
            }),
        })
    }
}

/// One line of a batch output file
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResultLine {
    /// Echo of the request's custom id
    pub custom_id: String,
    /// Response envelope (absent when the request errored)
    #[serde(default)]
    pub response: Option<BatchResponse>,
    /// Request-level error
    #[serde(default)]
    pub error: Option<Value>,
}

/// Response envelope inside a result line
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    /// HTTP status of the underlying request
    #[serde(default)]
    pub status_code: u16,
    /// Raw response body
    pub body: Value,
}

impl BatchResultLine {
    /// Parse one output line
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// The assistant message content of the first choice
    pub fn message_content(&self) -> Result<&str, String> {
        if let Some(error) = &self.error {
            if !error.is_null() {
                return Err(format!("request error: {}", error));
            }
        }

        let response = self
            .response
            .as_ref()
            .ok_or_else(|| "missing response".to_string())?;

        if let Some(error) = response.body.get("error") {
            return Err(format!(
                "response error (HTTP {}): {}",
                response.status_code, error
            ));
        }

        response
            .body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| "missing choices[0].message.content".to_string())
    }
}
