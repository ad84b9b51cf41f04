//! Project identity and stored records

use std::fmt;
use std::path::PathBuf;

/// Identity of a procurement project
///
/// Derived from the source document's file name with the final extension
/// removed, so `"6701234.pdf"` and the stored record `"6701234"` refer to the
/// same project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wrap an already-derived identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier from a file name by stripping its extension
    ///
    /// # Examples
    ///
    /// ```
    /// use torx_domain::ProjectId;
    ///
    /// assert_eq!(ProjectId::from_file_name("67019.pdf").as_str(), "67019");
    /// assert_eq!(ProjectId::from_file_name("a.b.PDF").as_str(), "a.b");
    /// assert_eq!(ProjectId::from_file_name("plain").as_str(), "plain");
    /// assert_eq!(ProjectId::from_file_name(".hidden").as_str(), ".hidden");
    /// ```
    pub fn from_file_name(file_name: &str) -> Self {
        match file_name.rfind('.') {
            // A leading dot marks a hidden file, not an extension
            Some(idx) if idx > 0 => Self(file_name[..idx].to_string()),
            _ => Self(file_name.to_string()),
        }
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A source document discovered in the input folder
///
/// Read once at job-build time and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Project the document belongs to
    pub project_id: ProjectId,

    /// File name including extension (used as the request's custom id)
    pub file_name: String,

    /// Full path on disk
    pub path: PathBuf,
}

impl SourceDocument {
    /// Build a document from a path, deriving the file name and project id
    ///
    /// Returns `None` when the path has no UTF-8 file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            project_id: ProjectId::from_file_name(&file_name),
            file_name,
            path,
        })
    }
}

/// Structured extraction result stored for a project
///
/// The payload is kept as the exact JSON text the model produced so that a
/// store round trip is byte-for-byte lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Primary key
    pub project_id: ProjectId,

    /// JSON object text
    pub payload: String,

    /// Last upsert time (milliseconds since Unix epoch)
    pub updated_at: u64,
}

/// A payload waiting to be upserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    /// Target project
    pub project_id: ProjectId,

    /// JSON object text
    pub payload: String,
}

impl RecordUpdate {
    /// Create a new update
    pub fn new(project_id: ProjectId, payload: impl Into<String>) -> Self {
        Self {
            project_id,
            payload: payload.into(),
        }
    }
}

/// Listing row: a project id and when it was last written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Project identity
    pub project_id: ProjectId,

    /// Last upsert time (milliseconds since Unix epoch)
    pub updated_at: u64,
}
