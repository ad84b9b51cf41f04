//! Check and watch command implementations.

use super::open_store;
use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use torx_domain::traits::{BatchService, Clock};
use torx_domain::BatchId;
use torx_tracker::{PollOutcome, Poller, RecoveryFile, TrackerError};

/// Batch id to follow and whether it came from the recovery file.
fn resolve_batch_id(arg: Option<String>, recovery: &RecoveryFile) -> Result<(BatchId, bool)> {
    if let Some(id) = arg.filter(|id| !id.trim().is_empty()) {
        return Ok((BatchId::new(id.trim()), false));
    }
    match recovery.load().map_err(TrackerError::Io)? {
        Some(id) => Ok((id, true)),
        None => Err(TrackerError::NoRecoveredBatch(recovery.path().to_path_buf()).into()),
    }
}

/// A failed batch cannot be resumed, so its recorded id is dropped.
fn forget_failed(outcome: &PollOutcome, recovery: &RecoveryFile, from_recovery: bool) {
    if from_recovery && matches!(outcome, PollOutcome::Failed { .. }) {
        if let Err(e) = recovery.clear() {
            tracing::warn!("Could not clear {}: {}", recovery.path().display(), e);
        }
    }
}

/// Execute the check command: one status query, reconcile if completed.
pub async fn execute_check<B, C>(
    args: BatchArgs,
    config: &Config,
    client: &B,
    clock: C,
    formatter: &Formatter,
) -> Result<PollOutcome>
where
    B: BatchService,
    B::Error: Display,
    C: Clock,
{
    let recovery = RecoveryFile::new(&config.batch.recovery_file);
    let (id, from_recovery) = resolve_batch_id(args.batch_id, &recovery)?;
    println!("{}", formatter.info(&format!("Checking batch {}", id)));

    let mut store = open_store(config)?;
    let mut poller = Poller::new(client, clock, config.batch.clone());
    let outcome = poller.check_once(&id, &mut store).await?;

    println!("{}", formatter.poll_outcome(&outcome));
    forget_failed(&outcome, &recovery, from_recovery);
    Ok(outcome)
}

/// Execute the watch command: poll until terminal, reconcile if completed.
pub async fn execute_watch<B, C>(
    args: BatchArgs,
    config: &Config,
    client: &B,
    clock: C,
    formatter: &Formatter,
) -> Result<PollOutcome>
where
    B: BatchService,
    B::Error: Display,
    C: Clock,
{
    let recovery = RecoveryFile::new(&config.batch.recovery_file);
    let (id, from_recovery) = resolve_batch_id(args.batch_id, &recovery)?;
    println!(
        "{}",
        formatter.info(&format!(
            "Watching batch {} (every {}s, Ctrl+C to stop)",
            id, config.batch.poll_interval_secs
        ))
    );

    let mut store = open_store(config)?;
    let mut poller = Poller::new(client, clock, config.batch.clone());
    let outcome = poller.run(&id, &mut store).await?;
    tracing::debug!("{}", poller.metrics().summary());

    println!("{}", formatter.poll_outcome(&outcome));
    forget_failed(&outcome, &recovery, from_recovery);
    Ok(outcome)
}
