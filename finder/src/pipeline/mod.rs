//! Network-facing pipeline stages
//!
//! Built on the injected traits only, so every stage runs against mocks.

pub mod extractor;
pub mod fetch;
pub mod paginator;

pub use extractor::extract_details;
pub use fetch::PoliteFetcher;
pub use paginator::{ListingPaginator, PageOutcome};
