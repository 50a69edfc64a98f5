//! Service implementations
//!
//! This module contains real implementations of all service traits.
//! These are the production implementations that handle actual I/O operations.

pub mod clock;
pub mod file_system;
pub mod http_fetcher;
pub mod page_parser;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use clock::{ManualClock, SystemClock};
pub use file_system::RealFileSystem;
pub use http_fetcher::RealPageFetcher;
pub use page_parser::HtmlPageParser;
