//! Shared types for the firm finder
//!
//! Holds the data model that crosses component boundaries (candidates, firm
//! records, ledger entries) together with the logging setup every binary uses.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
