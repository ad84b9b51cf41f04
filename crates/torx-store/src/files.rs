//! File-output record store
//!
//! Degenerate storage used when results should land on disk instead of in a
//! database: one `<project_id>.json` per project holding the payload verbatim, recency
//! taken from file modification time, dedup by file existence.

use crate::{check_payload, StoreError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;
use torx_domain::traits::RecordStore;
use torx_domain::{ProjectId, ProjectRecord, ProjectSummary, RecordUpdate};
use tracing::debug;

const EXTENSION: &str = "json";

/// Directory-of-JSON-files implementation of `RecordStore`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the output directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding a project's payload
    pub fn path_for(&self, id: &ProjectId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn modified_millis(path: &Path) -> Result<u64, StoreError> {
        let modified = fs::metadata(path)?.modified()?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0))
    }

    /// Write a record to a temp file next to its target
    ///
    /// Nothing is visible under the target name until the temp file is
    /// persisted.
    fn stage(&self, record: &RecordUpdate) -> Result<(NamedTempFile, PathBuf), StoreError> {
        let path = self.path_for(&record.project_id);
        if path.parent() != Some(self.dir.as_path()) {
            return Err(StoreError::InvalidData(format!(
                "project id '{}' is not a plain file name",
                record.project_id
            )));
        }
        if path.is_dir() {
            return Err(StoreError::InvalidData(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(record.payload.as_bytes())?;
        Ok((tmp, path))
    }
}

impl RecordStore for FileStore {
    type Error = StoreError;

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, Self::Error> {
        let mut projects = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(EXTENSION))
                .unwrap_or(false);
            let stem = path.file_stem().and_then(|s| s.to_str());
            if let (true, Some(stem)) = (is_json, stem) {
                projects.push(ProjectSummary {
                    project_id: ProjectId::new(stem),
                    updated_at: Self::modified_millis(&path)?,
                });
            }
        }

        projects.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.project_id.cmp(&b.project_id))
        });
        Ok(projects)
    }

    fn get_record(&self, id: &ProjectId) -> Result<Option<ProjectRecord>, Self::Error> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(ProjectRecord {
            project_id: id.clone(),
            payload: fs::read_to_string(&path)?,
            updated_at: Self::modified_millis(&path)?,
        }))
    }

    fn upsert_records(&mut self, records: &[RecordUpdate]) -> Result<usize, Self::Error> {
        for record in records {
            check_payload(record)?;
        }

        // Stage everything first; a failure here leaves the directory untouched
        let staged = records
            .iter()
            .map(|record| self.stage(record))
            .collect::<Result<Vec<_>, _>>()?;

        for (tmp, path) in staged {
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            debug!("Wrote {}", path.display());
        }

        Ok(records.len())
    }
}
