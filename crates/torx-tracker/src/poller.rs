//! Batch status polling
//!
//! The poller owns no state machine of its own: it observes the remote
//! status, sleeps while the batch is pending, and hands a completed batch
//! to the reconciler exactly once.

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::metrics::PollMetrics;
use crate::reconcile::{reconcile_output, ReconcileReport};
use std::fmt::Display;
use torx_domain::traits::{BatchService, Clock, RecordStore};
use torx_domain::{BatchId, BatchJob, BatchStatus};
use tracing::{debug, info, warn};

/// Where a batch stood when the poller returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Batch completed and its output was reconciled
    Completed {
        /// Final job snapshot
        job: BatchJob,
        /// Reconciliation counts
        report: ReconcileReport,
    },

    /// Batch ended as failed, expired, or cancelled
    Failed {
        /// Final job snapshot, including remote error messages
        job: BatchJob,
    },

    /// Batch is still running (only returned by `check_once`)
    Pending(BatchJob),
}

impl PollOutcome {
    /// Status reported by the service
    pub fn status(&self) -> BatchStatus {
        match self {
            PollOutcome::Completed { job, .. } => job.status,
            PollOutcome::Failed { job } => job.status,
            PollOutcome::Pending(job) => job.status,
        }
    }

    /// Convert a terminal failure into an error, passing other outcomes through
    pub fn into_result(self) -> Result<Self, TrackerError> {
        match self {
            PollOutcome::Failed { job } => Err(TrackerError::JobFailed {
                detail: failure_detail(&job),
                batch_id: job.id,
                status: job.status,
            }),
            other => Ok(other),
        }
    }
}

/// Remote error messages joined for display
pub fn failure_detail(job: &BatchJob) -> String {
    if job.errors.is_empty() {
        "no error detail reported".to_string()
    } else {
        job.errors.join("; ")
    }
}

/// Polls one batch until it reaches a terminal status
pub struct Poller<'a, B, C> {
    service: &'a B,
    clock: C,
    config: TrackerConfig,
    metrics: PollMetrics,
}

impl<'a, B, C> Poller<'a, B, C>
where
    B: BatchService,
    B::Error: Display,
    C: Clock,
{
    /// Create a poller over a shared service client
    pub fn new(service: &'a B, clock: C, config: TrackerConfig) -> Self {
        Self {
            service,
            clock,
            config,
            metrics: PollMetrics::new(),
        }
    }

    /// Metrics for this poller
    pub fn metrics(&self) -> &PollMetrics {
        &self.metrics
    }

    /// Poll until the batch is terminal
    ///
    /// Pending statuses sleep the poll interval; failed queries sleep the
    /// retry backoff and are retried without limit. A completed batch is
    /// reconciled once and no further queries are made.
    ///
    /// # Errors
    ///
    /// Only reconciliation errors end the loop with an error.
    pub async fn run<S>(&mut self, id: &BatchId, store: &mut S) -> Result<PollOutcome, TrackerError>
    where
        S: RecordStore,
        S::Error: Display,
    {
        info!(
            "Polling batch {} every {:?} (retry backoff {:?})",
            id,
            self.config.poll_interval(),
            self.config.retry_backoff()
        );

        loop {
            self.metrics.record_check();
            match self.service.retrieve_batch(id).await {
                Ok(job) if job.status.is_pending() => {
                    info!(
                        "Batch {} is {} ({} min elapsed){}",
                        id,
                        job.status,
                        self.metrics.elapsed_minutes(),
                        progress(&job)
                    );
                    let interval = self.config.poll_interval();
                    self.clock.sleep(interval).await;
                    self.metrics.record_pending(interval);
                }
                Ok(job) => return self.finish(job, store).await,
                Err(e) => {
                    warn!(
                        "Status check for {} failed: {}; retrying in {:?}",
                        id,
                        e,
                        self.config.retry_backoff()
                    );
                    let backoff = self.config.retry_backoff();
                    self.clock.sleep(backoff).await;
                    self.metrics.record_transient_error(backoff);
                }
            }
        }
    }

    /// Query the batch once without waiting
    ///
    /// Reconciles only if the batch has already completed.
    ///
    /// # Errors
    ///
    /// A failed query is returned as `Remote`; it is not retried here.
    pub async fn check_once<S>(
        &mut self,
        id: &BatchId,
        store: &mut S,
    ) -> Result<PollOutcome, TrackerError>
    where
        S: RecordStore,
        S::Error: Display,
    {
        self.metrics.record_check();
        let job = self
            .service
            .retrieve_batch(id)
            .await
            .map_err(|e| TrackerError::Remote(format!("status check for {} failed: {}", id, e)))?;

        if job.status.is_pending() {
            info!("Batch {} is {}{}", id, job.status, progress(&job));
            return Ok(PollOutcome::Pending(job));
        }
        self.finish(job, store).await
    }

    async fn finish<S>(&mut self, job: BatchJob, store: &mut S) -> Result<PollOutcome, TrackerError>
    where
        S: RecordStore,
        S::Error: Display,
    {
        if job.status.is_failure() {
            warn!("Batch {} ended as {}: {}", job.id, job.status, failure_detail(&job));
            return Ok(PollOutcome::Failed { job });
        }

        info!("Batch {} completed after {} checks", job.id, self.metrics.checks);
        let report = reconcile_output(self.service, &job, store).await?;
        debug!("{}", self.metrics.summary());
        Ok(PollOutcome::Completed { job, report })
    }
}

fn progress(job: &BatchJob) -> String {
    match &job.request_counts {
        Some(c) if c.total > 0 => {
            format!(" [{}/{} done, {} failed]", c.completed, c.total, c.failed)
        }
        _ => String::new(),
    }
}
