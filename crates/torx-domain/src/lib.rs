//! Torx Domain Layer
//!
//! Core model for the TOR bid-evidence extraction pipeline. This crate has
//! no external dependencies and defines the value types and trait seams that
//! the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Project**: one procurement document, identified by its file stem
//! - **Section**: the "bid submission evidence" clause cut out of a document
//! - **Batch job**: a remote, asynchronous unit of work holding many requests
//! - **Project record**: the structured JSON the model returned for a project
//!
//! ## Architecture
//!
//! - Pure data and traits only
//! - `RecordStore` is implemented by `torx-store`
//! - `BatchService` is implemented by `torx-llm`
//! - `TextSource` is implemented by `torx-extractor`
//! - `Clock` is implemented by `torx-tracker`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod project;
pub mod traits;

// Re-exports for convenience
pub use batch::{BatchId, BatchJob, BatchStatus, FileId, RequestCounts, UnknownStatus};
pub use project::{ProjectId, ProjectRecord, ProjectSummary, RecordUpdate, SourceDocument};
