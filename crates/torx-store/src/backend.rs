//! Backend selection from configuration

use crate::{FileStore, SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use torx_domain::traits::RecordStore;
use torx_domain::{ProjectId, ProjectRecord, ProjectSummary, RecordUpdate};

/// Where project records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// SQLite database (default)
    #[default]
    Sqlite,
    /// One JSON file per project
    Files,
}

/// Storage configuration
///
/// ```toml
/// [storage]
/// mode = "sqlite"
/// db_path = "torx.db"
/// output_dir = "output_json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use
    #[serde(default)]
    pub mode: StorageMode,

    /// SQLite database file (sqlite mode)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Output directory (files mode)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("torx.db")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output_json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Sqlite,
            db_path: default_db_path(),
            output_dir: default_output_dir(),
        }
    }
}

/// A record store chosen at runtime
pub enum RecordBackend {
    /// SQLite database
    Sqlite(SqliteStore),
    /// JSON files
    Files(FileStore),
}

impl RecordBackend {
    /// Open the backend described by `config`
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        match config.mode {
            StorageMode::Sqlite => Ok(Self::Sqlite(SqliteStore::new(&config.db_path)?)),
            StorageMode::Files => Ok(Self::Files(FileStore::new(&config.output_dir)?)),
        }
    }

    /// Human-readable location of the backend
    pub fn describe(config: &StorageConfig) -> String {
        match config.mode {
            StorageMode::Sqlite => format!("sqlite:{}", config.db_path.display()),
            StorageMode::Files => format!("files:{}", config.output_dir.display()),
        }
    }
}

impl RecordStore for RecordBackend {
    type Error = StoreError;

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, Self::Error> {
        match self {
            Self::Sqlite(store) => store.list_projects(),
            Self::Files(store) => store.list_projects(),
        }
    }

    fn get_record(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, Self::Error> {
        match self {
            Self::Sqlite(store) => store.get_record(id),
            Self::Files(store) => store.get_record(id),
        }
    }

    fn upsert_records(&mut self, records: &[RecordUpdate]) -> Result<usize, Self::Error> {
        match self {
            Self::Sqlite(store) => store.upsert_records(records),
            Self::Files(store) => store.upsert_records(records),
        }
    }
}
