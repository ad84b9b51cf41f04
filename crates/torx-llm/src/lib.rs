//! Torx LLM Batch Layer
//!
//! Client for an OpenAI-compatible batch API, implementing the
//! `BatchService` trait from `torx-domain`.
//!
//! # Providers
//!
//! - `OpenAiBatchClient`: REST client over `reqwest`
//! - `MockBatchService`: scripted in-memory service for tests
//!
//! # Examples
//!
//! ```
//! use torx_llm::MockBatchService;
//! use torx_domain::{BatchId, BatchJob, BatchStatus};
//!
//! let service = MockBatchService::new();
//! service.push_status(BatchJob::new(BatchId::new("batch_1"), BatchStatus::InProgress));
//! assert_eq!(service.retrieve_count(), 0);
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod openai;
pub mod wire;

use thiserror::Error;

pub use mock::MockBatchService;
pub use openai::OpenAiBatchClient;
pub use wire::{
    BatchRequestLine, BatchResultLine, ChatCompletionBody, ChatMessage, ResponseFormat,
    CHAT_COMPLETIONS_ENDPOINT, COMPLETION_WINDOW,
};

/// Errors that can occur while talking to the batch API
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status with the remote error payload
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body as returned by the service
        body: String,
    },

    /// API key rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Communication(e.to_string())
        }
    }
}
