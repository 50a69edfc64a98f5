//! Core business logic modules
//!
//! This module contains pure business logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod backoff;
pub mod candidate;
pub mod classifier;
pub mod labels;
pub mod ledger;
pub mod planner;
pub mod state;

pub use backoff::{PacingPolicy, RetryPolicy};
pub use classifier::{classify, website_absent, Classification};
pub use labels::{Field, FieldSet, LabelMap};
pub use ledger::Ledger;
pub use planner::{Query, QueryPlanner};
pub use state::{AbortReason, FailureTracker, RunOutcome, RunPhase, RunStatus};
