//! Auto pilot command implementation.

use super::{execute_submit, execute_watch};
use crate::cli::{BatchArgs, SubmitArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use torx_domain::traits::{BatchService, Clock};
use torx_tracker::PollOutcome;

/// Execute the auto command: submit, then watch the new batch.
///
/// Returns `None` when there was nothing to submit.
pub async fn execute_auto<B, C>(
    args: SubmitArgs,
    config: &Config,
    client: &B,
    clock: C,
    formatter: &Formatter,
) -> Result<Option<PollOutcome>>
where
    B: BatchService,
    B::Error: Display,
    C: Clock,
{
    let Some(job) = execute_submit(args, config, client, formatter).await? else {
        return Ok(None);
    };

    let watch = BatchArgs {
        batch_id: Some(job.id.to_string()),
    };
    let outcome = execute_watch(watch, config, client, clock, formatter).await?;
    Ok(Some(outcome))
}
