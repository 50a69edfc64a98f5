//! Run state machine types
//!
//! The orchestrator drives a run through these phases:
//! Planning → Paginating → Extracting → Classifying → Recording → (loop),
//! ending in Completed or Aborted.

use std::fmt;

use shared::{Candidate, FirmRecord, RunResult};

use crate::core::labels::FieldSet;

/// Current phase of a run, carrying the data the next step needs
#[derive(Debug, Clone, PartialEq)]
pub enum RunPhase {
    Planning,
    Paginating,
    Extracting(Candidate),
    Classifying(Candidate, FieldSet),
    Recording(FirmRecord),
    Completed,
    Aborted(AbortReason),
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Paginating => "paginating",
            Self::Extracting(_) => "extracting",
            Self::Classifying(..) => "classifying",
            Self::Recording(_) => "recording",
            Self::Completed => "completed",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Why a run was aborted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Too many fetch/parse failures in a row
    ConsecutiveFailures { count: u32 },
    /// Ledger or result file could not be written
    Persistence { message: String },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConsecutiveFailures { count } => write!(f, "{count} consecutive failures"),
            Self::Persistence { message } => write!(f, "persistence failure: {message}"),
        }
    }
}

/// Terminal status of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Aborted(AbortReason),
}

/// What a run produced and how it ended
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub result: RunResult,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Process exit code for one-shot mode
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Completed => 0,
            RunStatus::Aborted(_) => 1,
        }
    }
}

/// Consecutive fetch/parse failure counter
#[derive(Debug, Clone)]
pub struct FailureTracker {
    consecutive: u32,
    threshold: u32,
}

impl FailureTracker {
    pub fn new(threshold: u32) -> Self {
        Self { consecutive: 0, threshold }
    }

    /// Count one failure. Returns true once the threshold is exceeded.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive > self.threshold
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub fn count(&self) -> u32 {
        self.consecutive
    }
}
