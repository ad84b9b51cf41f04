//! Lazily opened storage handle shared by all requests.

use std::sync::{Mutex, PoisonError};
use torx_store::{RecordBackend, StorageConfig, StoreError};
use tracing::{debug, info, warn};

/// A storage backend opened on first use and dropped on refresh
///
/// A failed query also drops the backend, so the next request reopens it.
pub struct StoreHandle {
    config: StorageConfig,
    backend: Mutex<Option<RecordBackend>>,
}

impl StoreHandle {
    /// Create a handle; nothing is opened until the first query
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            backend: Mutex::new(None),
        }
    }

    /// Storage location for display
    pub fn describe(&self) -> String {
        RecordBackend::describe(&self.config)
    }

    /// Whether a backend is currently open
    pub fn is_open(&self) -> bool {
        self.backend
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run `f` against the backend, opening it if needed
    pub fn with<T>(
        &self,
        f: impl FnOnce(&RecordBackend) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.backend.lock().unwrap_or_else(PoisonError::into_inner);

        let backend = match guard.take() {
            Some(backend) => backend,
            None => {
                info!("Opening storage {}", self.describe());
                RecordBackend::open(&self.config)?
            }
        };

        match f(&backend) {
            Ok(value) => {
                *guard = Some(backend);
                Ok(value)
            }
            Err(e) => {
                warn!("Storage query failed, dropping handle: {}", e);
                Err(e)
            }
        }
    }

    /// Drop the open backend so the next query reopens it
    pub fn invalidate(&self) {
        let mut guard = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("Storage handle invalidated");
        }
    }
}
