//! Firm finder library
//!
//! Collects directory listings of firms that have no website of their own:
//! keyword queries are paginated, each candidate's detail page is parsed and
//! classified, and qualifying firms are written to a dated result file and
//! a persistent dedup ledger so no firm is reported twice.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod scheduler;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::FinderConfig;
pub use core::{Classification, Ledger, QueryPlanner, RunOutcome, RunStatus};
pub use error::{FinderError, FinderResult};
pub use orchestrator::Orchestrator;
pub use scheduler::Scheduler;
pub use traits::{Clock, FileSystem, PageFetcher, PageParser};
