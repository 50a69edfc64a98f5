//! Clock implementations

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::Clock;

/// Wall clock with tokio sleeps
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deterministic clock: sleeping advances the time instantly
///
/// Clones share the same time and sleep log, so a test can keep one handle
/// while the code under test owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockState>>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Local>,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockState { now: start, sleeps: Vec::new() })),
        }
    }

    /// Move time forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state();
        state.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state().sleeps.clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.state().sleeps.iter().sum()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ManualClockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.state().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state();
        state.sleeps.push(duration);
        state.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }
}
