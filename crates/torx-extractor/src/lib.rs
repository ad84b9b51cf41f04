//! Torx Extractor
//!
//! Turns a folder of TOR documents into a batch job file.
//!
//! # Overview
//!
//! Each document is flattened to text, the "bid submission evidence" clause
//! is cut out, and the clause becomes one chat-completion request asking the
//! model for structured JSON.
//!
//! # Architecture
//!
//! ```text
//! input folder → scan → skip stored → TextSource → SectionExtractor → request → job file
//! ```
//!
//! # Key Features
//!
//! - **Bounded extraction**: at most `concurrency` documents in flight
//! - **Skip existing**: projects already in storage are never resubmitted
//! - **Atomic job file**: staged next to the target and renamed into place
//!
//! # Example Usage
//!
//! ```no_run
//! use std::collections::HashSet;
//! use torx_extractor::{DocumentTextSource, ExtractorConfig, JobBuilder, ModelConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = JobBuilder::new(
//!     DocumentTextSource::new(),
//!     ExtractorConfig::default(),
//!     ModelConfig::default(),
//! )?;
//!
//! let report = builder.build(&HashSet::new()).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod prompt;
mod section;
mod source;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{scan_documents, write_job_file, JobBuilder};
pub use config::{ExtractorConfig, ModelConfig, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
pub use error::ExtractorError;
pub use prompt::{build_request, system_prompt, TARGET_JSON_SCHEMA, USER_MESSAGE_PREFIX};
pub use section::{collapse_whitespace, SectionExtractor};
pub use source::{DocumentTextSource, TextError};
pub use types::{JobBuildReport, RequestBatch};
