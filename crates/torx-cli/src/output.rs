//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use torx_domain::{BatchJob, ProjectRecord, ProjectSummary};
use torx_extractor::JobBuildReport;
use torx_store::format_timestamp;
use torx_tracker::{failure_detail, PollOutcome, ReconcileReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the project listing.
    pub fn format_projects(&self, projects: &[ProjectSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = projects
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "project_id": p.project_id.as_str(),
                            "updated_at": p.updated_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(projects
                .iter()
                .map(|p| p.project_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if projects.is_empty() {
                    return Ok(self.colorize("No projects stored.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Project", "Updated"]);
                for (i, project) in projects.iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        project.project_id.to_string(),
                        format_timestamp(project.updated_at),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format one stored record.
    ///
    /// Table and JSON formats print the payload pretty-printed; quiet prints
    /// it exactly as stored.
    pub fn format_record(&self, record: &ProjectRecord) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(record.payload.clone()),
            OutputFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&record.payload)?;
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let value: serde_json::Value = serde_json::from_str(&record.payload)?;
                Ok(format!(
                    "{}\n{}",
                    self.colorize(
                        &format!(
                            "{} (updated {})",
                            record.project_id,
                            format_timestamp(record.updated_at)
                        ),
                        "cyan"
                    ),
                    serde_json::to_string_pretty(&value)?
                ))
            }
        }
    }

    /// Format job build counts.
    pub fn build_report(&self, report: &JobBuildReport) -> String {
        let mut lines = vec![self.info(&format!("Job build: {}", report.summary()))];
        for name in &report.missing_sections {
            lines.push(self.warning(&format!("No bid evidence section: {}", name)));
        }
        match &report.job_file {
            Some(path) => lines.push(self.success(&format!(
                "Wrote {} request(s) to {}",
                report.queued,
                path.display()
            ))),
            None => lines.push(self.warning("No new work to submit")),
        }
        lines.join("\n")
    }

    /// Format a submitted batch.
    pub fn submitted(&self, job: &BatchJob) -> String {
        self.success(&format!("Submitted batch {} (status: {})", job.id, job.status))
    }

    /// Format reconciliation counts.
    pub fn reconcile_report(&self, report: &ReconcileReport) -> String {
        let summary = format!("Saved {} record(s), {} line(s) failed", report.saved, report.failed);
        if report.failed > 0 {
            self.warning(&summary)
        } else {
            self.success(&summary)
        }
    }

    /// Format a poll outcome.
    pub fn poll_outcome(&self, outcome: &PollOutcome) -> String {
        match outcome {
            PollOutcome::Completed { job, report } => format!(
                "{}\n{}",
                self.success(&format!("Batch {} completed", job.id)),
                self.reconcile_report(report)
            ),
            PollOutcome::Failed { job } => self.error(&format!(
                "Batch {} ended as {}: {}",
                job.id,
                job.status,
                failure_detail(job)
            )),
            PollOutcome::Pending(job) => {
                let progress = job
                    .request_counts
                    .as_ref()
                    .filter(|c| c.total > 0)
                    .map(|c| format!(" ({}/{} done)", c.completed, c.total))
                    .unwrap_or_default();
                self.info(&format!("Batch {} is {}{}", job.id, job.status, progress))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
