//! Submit command implementation.

use super::open_store;
use crate::cli::SubmitArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::collections::HashSet;
use std::fmt::Display;
use torx_domain::traits::{BatchService, RecordStore};
use torx_domain::{BatchJob, ProjectId};
use torx_extractor::{DocumentTextSource, JobBuildReport, JobBuilder};
use torx_tracker::{RecoveryFile, Submitter};

/// Build the job file from the input folder.
pub async fn build_job_file(
    args: &SubmitArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<JobBuildReport> {
    let mut extract = config.extract.clone();
    if let Some(dir) = &args.input_dir {
        extract.input_dir = dir.clone();
    }
    if let Some(n) = args.concurrency {
        extract.concurrency = n;
    }
    if args.all {
        extract.skip_existing = false;
    }

    let existing: HashSet<ProjectId> = if extract.skip_existing {
        open_store(config)?
            .list_projects()?
            .into_iter()
            .map(|summary| summary.project_id)
            .collect()
    } else {
        HashSet::new()
    };

    let builder = JobBuilder::new(DocumentTextSource::new(), extract, config.model.clone())?;
    let report = builder.build(&existing).await?;
    println!("{}", formatter.build_report(&report));
    Ok(report)
}

/// Execute the submit command.
///
/// Returns `None` when there was nothing to submit.
pub async fn execute_submit<B>(
    args: SubmitArgs,
    config: &Config,
    client: &B,
    formatter: &Formatter,
) -> Result<Option<BatchJob>>
where
    B: BatchService,
    B::Error: Display,
{
    let report = build_job_file(&args, config, formatter).await?;
    let Some(job_file) = report.job_file else {
        return Ok(None);
    };

    let submitter = Submitter::new(client, RecoveryFile::new(&config.batch.recovery_file));
    let job = submitter.submit(&job_file).await?;
    println!("{}", formatter.submitted(&job));
    println!(
        "{}",
        formatter.info(&format!(
            "Batch id saved to {}",
            config.batch.recovery_file.display()
        ))
    );
    Ok(Some(job))
}
