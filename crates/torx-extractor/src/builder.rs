//! Job file construction
//!
//! Documents are scanned, filtered against already-stored projects, and
//! flattened on blocking worker threads. At most `concurrency` extractions
//! run at once; every dispatched extraction is awaited and a failure in one
//! never cancels the others.

use crate::config::{ExtractorConfig, ModelConfig};
use crate::error::ExtractorError;
use crate::prompt::build_request;
use crate::section::SectionExtractor;
use crate::types::{JobBuildReport, RequestBatch};
use std::collections::HashSet;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use torx_domain::traits::TextSource;
use torx_domain::{ProjectId, SourceDocument};
use torx_llm::BatchRequestLine;
use tracing::{debug, info, warn};

/// List documents in `folder` whose extension matches `extension`
///
/// The match ignores ASCII case. Results are sorted by file name.
pub fn scan_documents(
    folder: &Path,
    extension: &str,
) -> Result<Vec<SourceDocument>, ExtractorError> {
    if !folder.is_dir() {
        return Err(ExtractorError::InputFolderMissing(folder.to_path_buf()));
    }

    let wanted = extension.trim_start_matches('.');
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if !matches {
            continue;
        }
        match SourceDocument::from_path(&path) {
            Some(doc) => documents.push(doc),
            None => warn!("Skipping {}: file name is not valid UTF-8", path.display()),
        }
    }

    if documents.is_empty() {
        return Err(ExtractorError::NoDocuments {
            folder: folder.to_path_buf(),
            extension: wanted.to_string(),
        });
    }

    documents.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(documents)
}

/// Write `requests` as newline-delimited JSON
///
/// The file is staged next to `path` and renamed into place, so readers
/// never observe a partial job file.
pub fn write_job_file(path: &Path, requests: &[BatchRequestLine]) -> Result<(), ExtractorError> {
    if requests.is_empty() {
        return Err(ExtractorError::NoWork);
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut staged = NamedTempFile::new_in(&dir)?;
    for request in requests {
        writeln!(staged, "{}", request.to_json_line()?)?;
    }
    staged.flush()?;
    staged
        .persist(path)
        .map_err(|e| ExtractorError::Io(e.error))?;

    debug!("Wrote {} requests to {}", requests.len(), path.display());
    Ok(())
}

/// Builds job files from a folder of documents
pub struct JobBuilder<T> {
    source: Arc<T>,
    sections: Arc<SectionExtractor>,
    config: ExtractorConfig,
    model: ModelConfig,
}

impl<T> JobBuilder<T>
where
    T: TextSource + Send + Sync + 'static,
    T::Error: Display,
{
    /// Create a builder, validating both configs
    pub fn new(
        source: T,
        config: ExtractorConfig,
        model: ModelConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        model.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            source: Arc::new(source),
            sections: Arc::new(SectionExtractor::new()?),
            config,
            model,
        })
    }

    /// Builder configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Turn documents into requests
    ///
    /// Documents whose project is in `existing` are skipped when
    /// `skip_existing` is set.
    pub async fn build_requests(
        &self,
        documents: Vec<SourceDocument>,
        existing: &HashSet<ProjectId>,
    ) -> Result<RequestBatch, ExtractorError> {
        let mut batch = RequestBatch::default();

        let (skipped, pending): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|doc| self.config.skip_existing && existing.contains(&doc.project_id));
        batch.skipped_existing = skipped.len();
        if batch.skipped_existing > 0 {
            info!("Skipping {} documents already stored", batch.skipped_existing);
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut workers = JoinSet::new();

        for doc in pending {
            // Wait for a slot before the blocking task exists
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ExtractorError::Worker(e.to_string()))?;
            let source = Arc::clone(&self.source);
            let sections = Arc::clone(&self.sections);
            let file_name = doc.file_name.clone();

            workers.spawn_blocking(move || {
                let _permit = permit;
                let section = sections.extract_from_document(source.as_ref(), &doc.path);
                (doc, section)
            });
            debug!("Dispatched {}", file_name);
        }

        let mut found = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((doc, Some(section))) => found.push((doc, section)),
                Ok((doc, None)) => {
                    warn!("No bid evidence section in {}", doc.file_name);
                    batch.extraction_failed += 1;
                    batch.missing_sections.push(doc.file_name);
                }
                Err(e) => {
                    warn!("Extraction worker failed: {}", e);
                    batch.extraction_failed += 1;
                }
            }
        }

        found.sort_by(|(a, _), (b, _)| a.file_name.cmp(&b.file_name));
        batch.missing_sections.sort();
        batch.requests = found
            .iter()
            .map(|(doc, section)| build_request(doc, section, &self.model))
            .collect();

        Ok(batch)
    }

    /// Scan the input folder and write the job file
    ///
    /// When nothing is left to submit the report carries no job file and
    /// any previous job file is left untouched.
    pub async fn build(
        &self,
        existing: &HashSet<ProjectId>,
    ) -> Result<JobBuildReport, ExtractorError> {
        let documents = scan_documents(&self.config.input_dir, &self.config.extension)?;
        let scanned = documents.len();
        info!("Found {} documents in {}", scanned, self.config.input_dir.display());

        let batch = self.build_requests(documents, existing).await?;

        let job_file = if batch.requests.is_empty() {
            info!("No new work to submit");
            None
        } else {
            write_job_file(&self.config.job_file, &batch.requests)?;
            Some(self.config.job_file.clone())
        };

        let report = JobBuildReport {
            scanned,
            skipped_existing: batch.skipped_existing,
            extraction_failed: batch.extraction_failed,
            queued: batch.queued(),
            missing_sections: batch.missing_sections,
            job_file,
        };
        info!("Job build: {}", report.summary());
        Ok(report)
    }
}
