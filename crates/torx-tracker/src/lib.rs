//! Torx Tracker
//!
//! Submits job files to the batch service, follows the batch until it is
//! terminal, and reconciles the output into storage.
//!
//! # Overview
//!
//! - **Submission**: upload, create, and record the batch id in a recovery
//!   file so a later run can resume without resubmitting
//! - **Polling**: coarse sleep-and-recheck on a fixed interval, with an
//!   unbounded retry on failed status checks
//! - **Reconciliation**: per-line parsing of the output file; bad lines are
//!   counted and skipped, good ones are upserted in one batch
//!
//! # Status Lifecycle
//!
//! | Status | Poller action |
//! |--------|---------------|
//! | `validating`, `in_progress`, `finalizing`, `cancelling` | sleep poll interval, re-check |
//! | `completed` | reconcile once, stop |
//! | `failed`, `expired`, `cancelled` | report detail, stop |
//! | query error | sleep retry backoff, re-check |
//!
//! # Usage
//!
//! ```no_run
//! use torx_tracker::{Poller, PollOutcome, RecoveryFile, Submitter, TokioClock, TrackerConfig};
//! use torx_llm::OpenAiBatchClient;
//! use torx_store::SqliteStore;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiBatchClient::new("sk-...")?;
//! let config = TrackerConfig::default();
//! let mut store = SqliteStore::new("torx.db")?;
//!
//! let submitter = Submitter::new(&client, RecoveryFile::new(&config.recovery_file));
//! let job = submitter.submit(Path::new("batch_input_pg.jsonl")).await?;
//!
//! let mut poller = Poller::new(&client, TokioClock, config);
//! if let PollOutcome::Completed { report, .. } = poller.run(&job.id, &mut store).await? {
//!     println!("{}", report.summary());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod metrics;
mod poller;
mod reconcile;
mod recovery;
mod submit;

pub use clock::{ManualClock, TokioClock};
pub use config::TrackerConfig;
pub use error::TrackerError;
pub use metrics::PollMetrics;
pub use poller::{failure_detail, PollOutcome, Poller};
pub use reconcile::{reconcile_output, reconcile_payload, ReconcileReport};
pub use recovery::RecoveryFile;
pub use submit::Submitter;
