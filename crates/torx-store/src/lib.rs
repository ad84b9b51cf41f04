//! Torx Storage Layer
//!
//! Implements the `RecordStore` trait over two backends:
//!
//! - [`SqliteStore`]: a single `batch_json` table keyed by project id
//! - [`FileStore`]: one `<project_id>.json` file per project (file-output mode)
//!
//! [`RecordBackend`] picks one of them from a [`StorageConfig`].
//!
//! # Examples
//!
//! ```no_run
//! use torx_domain::traits::RecordStore;
//! use torx_domain::{ProjectId, RecordUpdate};
//! use torx_store::SqliteStore;
//!
//! let mut store = SqliteStore::new("torx.db").unwrap();
//! store
//!     .upsert_records(&[RecordUpdate::new(ProjectId::new("6701"), r#"{"a":1}"#)])
//!     .unwrap();
//! ```

#![warn(missing_docs)]

mod backend;
mod files;
mod sqlite;

pub use backend::{RecordBackend, StorageConfig, StorageMode};
pub use files::FileStore;
pub use sqlite::SqliteStore;

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error (file-output mode)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload is not a JSON object
    #[error("Invalid payload for project '{project_id}': {reason}")]
    InvalidPayload {
        /// Offending project
        project_id: String,
        /// Why the payload was rejected
        reason: String,
    },

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Current time in milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Render an `updated_at` value (milliseconds since the Unix epoch) as UTC
///
/// Out-of-range values are shown as the raw number.
pub fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Reject payloads that are not JSON objects before they reach storage
pub(crate) fn check_payload(update: &torx_domain::RecordUpdate) -> Result<(), StoreError> {
    match serde_json::from_str::<serde_json::Value>(&update.payload) {
        Ok(serde_json::Value::Object(_)) => Ok(()),
        Ok(_) => Err(StoreError::InvalidPayload {
            project_id: update.project_id.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(StoreError::InvalidPayload {
            project_id: update.project_id.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
    }
}
