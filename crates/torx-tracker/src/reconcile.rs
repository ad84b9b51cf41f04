//! Result reconciliation
//!
//! Turns a batch output file into stored project records. Each line is
//! handled on its own: a malformed line is logged and counted, and the
//! remaining lines still go through.

use crate::error::TrackerError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use torx_domain::traits::{BatchService, RecordStore};
use torx_domain::{BatchJob, ProjectId, RecordUpdate};
use torx_llm::BatchResultLine;
use tracing::{info, warn};

/// Counts from one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Non-blank lines in the output
    pub lines: usize,

    /// Records written to storage
    pub saved: usize,

    /// Lines that could not be turned into a record
    pub failed: usize,

    /// Valid lines replaced by a later line for the same project
    pub superseded: usize,
}

impl ReconcileReport {
    /// One-line summary for logs and terminal output
    pub fn summary(&self) -> String {
        format!(
            "{} lines, {} saved, {} failed, {} superseded",
            self.lines, self.saved, self.failed, self.superseded
        )
    }
}

/// Parsed records plus the counts gathered on the way
#[derive(Debug, Default)]
struct ParsedOutput {
    records: Vec<RecordUpdate>,
    lines: usize,
    failed: usize,
    superseded: usize,
}

/// Turn one output line into a record update
///
/// The model's content is kept verbatim once it is known to be a JSON
/// object.
fn parse_line(line: &str) -> Result<RecordUpdate, String> {
    let result = BatchResultLine::parse(line).map_err(|e| format!("not a result line: {}", e))?;
    let content = result
        .message_content()
        .map_err(|e| format!("{}: {}", result.custom_id, e))?;

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(_)) => Ok(RecordUpdate::new(
            ProjectId::from_file_name(&result.custom_id),
            content,
        )),
        Ok(_) => Err(format!("{}: content is not a JSON object", result.custom_id)),
        Err(e) => Err(format!("{}: content is not valid JSON: {}", result.custom_id, e)),
    }
}

fn parse_output(content: &str) -> ParsedOutput {
    let mut parsed = ParsedOutput::default();
    let mut positions: HashMap<ProjectId, usize> = HashMap::new();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        parsed.lines += 1;

        match parse_line(line) {
            Ok(update) => match positions.get(&update.project_id) {
                Some(&index) => {
                    warn!(
                        "Line {}: {} appears again, keeping the later result",
                        number + 1,
                        update.project_id
                    );
                    parsed.records[index] = update;
                    parsed.superseded += 1;
                }
                None => {
                    positions.insert(update.project_id.clone(), parsed.records.len());
                    parsed.records.push(update);
                }
            },
            Err(reason) => {
                warn!("Line {}: skipped ({})", number + 1, reason);
                parsed.failed += 1;
            }
        }
    }

    parsed
}

/// Parse an output payload and upsert every valid record
///
/// # Errors
///
/// Returns `Storage` if the upsert fails; no partial count is reported.
pub fn reconcile_payload<S>(content: &str, store: &mut S) -> Result<ReconcileReport, TrackerError>
where
    S: RecordStore,
    S::Error: Display,
{
    let parsed = parse_output(content);

    let saved = if parsed.records.is_empty() {
        0
    } else {
        store
            .upsert_records(&parsed.records)
            .map_err(|e| TrackerError::Storage(e.to_string()))?
    };

    let report = ReconcileReport {
        lines: parsed.lines,
        saved,
        failed: parsed.failed,
        superseded: parsed.superseded,
    };
    info!("Reconciled: {}", report.summary());
    Ok(report)
}

/// Download a completed batch's output and reconcile it
///
/// # Errors
///
/// - `MissingOutput` if the job has no output file
/// - `Remote` if the download fails
/// - `Storage` if the upsert fails
pub async fn reconcile_output<B, S>(
    service: &B,
    job: &BatchJob,
    store: &mut S,
) -> Result<ReconcileReport, TrackerError>
where
    B: BatchService,
    B::Error: Display,
    S: RecordStore,
    S::Error: Display,
{
    let output = job
        .output_file_id
        .as_ref()
        .ok_or_else(|| TrackerError::MissingOutput(job.id.clone()))?;

    info!("Downloading output {} for batch {}", output, job.id);
    let content = service
        .file_content(output)
        .await
        .map_err(|e| TrackerError::Remote(format!("download of {} failed: {}", output, e)))?;

    reconcile_payload(&content, store)
}
