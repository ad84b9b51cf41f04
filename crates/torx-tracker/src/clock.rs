//! Clocks for the polling loop

use std::sync::{Arc, Mutex};
use std::time::Duration;
use torx_domain::traits::Clock;

/// Real clock backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that returns immediately and records every requested sleep
///
/// Clones share the record, so a test can keep a handle while the poller
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl ManualClock {
    /// Create a clock with no recorded sleeps
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Sum of all requested sleeps
    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(duration);
    }
}
