//! Document text layer
//!
//! PDFs go through `pdf-extract`; any other extension is read as UTF-8 text,
//! which lets plain-text fixtures stand in for real TOR documents.

use std::path::{Path, PathBuf};
use thiserror::Error;
use torx_domain::traits::TextSource;

/// Errors from flattening a document
#[derive(Error, Debug)]
pub enum TextError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Document path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// PDF could not be parsed
    #[error("Failed to parse PDF {path}: {reason}")]
    Pdf {
        /// Document path
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

/// Text source backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextSource;

impl DocumentTextSource {
    /// Create a new text source
    pub fn new() -> Self {
        Self
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

impl TextSource for DocumentTextSource {
    type Error = TextError;

    fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        let bytes = std::fs::read(path).map_err(|source| TextError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if is_pdf(path) {
            let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| TextError::Pdf {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            // Page breaks become line breaks so clause markers still start a line
            Ok(text.replace('\u{c}', "\n"))
        } else {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "๓. หลักฐาน").unwrap();

        let text = DocumentTextSource::new().extract_text(&path).unwrap();
        assert_eq!(text, "๓. หลักฐาน");
    }

    #[test]
    fn test_missing_file() {
        let err = DocumentTextSource::new()
            .extract_text(Path::new("/definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, TextError::Read { .. }));
    }

    #[test]
    fn test_corrupt_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.PDF");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = DocumentTextSource::new().extract_text(&path).unwrap_err();
        assert!(matches!(err, TextError::Pdf { .. }));
    }
}
