//! Retry and pacing decisions (pure functions)

use chrono::{DateTime, Local};
use std::time::Duration;

use crate::error::FinderError;

/// Bounded exponential backoff for transient fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the next attempt, or `None` to give up
    ///
    /// `attempt` is the zero-based index of the attempt that just failed.
    pub fn should_retry(&self, error: &FinderError, attempt: u32) -> Option<Duration> {
        if !error.is_transient() || attempt + 1 >= self.max_attempts {
            return None;
        }
        Some(self.delay_for(attempt))
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Minimum spacing between consecutive requests to the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub min_interval: Duration,
    pub jitter: Duration,
}

impl PacingPolicy {
    /// Time still to wait before the next request may go out
    pub fn remaining(&self, last_request: Option<DateTime<Local>>, now: DateTime<Local>) -> Duration {
        let Some(last) = last_request else {
            return Duration::ZERO;
        };
        let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
        self.min_interval.saturating_sub(elapsed)
    }
}
