//! Recovery file holding the last submitted batch id
//!
//! Lets a later invocation resume tracking a batch without resubmitting.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use torx_domain::BatchId;

/// Plain-text file containing one batch id
#[derive(Debug, Clone)]
pub struct RecoveryFile {
    path: PathBuf,
}

impl RecoveryFile {
    /// Point at a recovery file (it need not exist yet)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the recorded batch id
    ///
    /// A missing or blank file yields `None`.
    pub fn load(&self) -> std::io::Result<Option<BatchId>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let id = text.trim();
                Ok((!id.is_empty()).then(|| BatchId::new(id)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Record `id`, replacing any previous content atomically
    pub fn save(&self, id: &BatchId) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(id.as_str().as_bytes())?;
        staged.flush()?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Remove the file; a missing file is not an error
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
