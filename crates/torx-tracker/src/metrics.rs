//! Metrics collected while polling a batch

use std::time::Duration;

/// Counters for one polling session
///
/// `waited` sums the sleeps the poller asked for, so it reflects the
/// configured cadence even when a test clock returns immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollMetrics {
    /// Status queries issued
    pub checks: usize,

    /// Checks that found the batch still pending
    pub pending_polls: usize,

    /// Checks that failed and were retried after the backoff
    pub transient_errors: usize,

    /// Total time spent sleeping between checks
    pub waited: Duration,
}

impl PollMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status query
    pub fn record_check(&mut self) {
        self.checks += 1;
    }

    /// Record a pending observation followed by a sleep
    pub fn record_pending(&mut self, slept: Duration) {
        self.pending_polls += 1;
        self.waited += slept;
    }

    /// Record a failed query followed by a backoff
    pub fn record_transient_error(&mut self, slept: Duration) {
        self.transient_errors += 1;
        self.waited += slept;
    }

    /// Whole minutes spent waiting
    pub fn elapsed_minutes(&self) -> u64 {
        self.waited.as_secs() / 60
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Poll Metrics Summary".to_string(),
            "====================".to_string(),
            format!("Status checks: {}", self.checks),
            format!("Pending polls: {}", self.pending_polls),
            format!("Transient errors: {}", self.transient_errors),
            format!("Time waited: {} min", self.elapsed_minutes()),
        ]
        .join("\n")
    }
}
