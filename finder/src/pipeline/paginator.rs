//! Sequential walk over the result pages of one query

use shared::Candidate;

use crate::config::SiteConfig;
use crate::core::Query;
use crate::error::FinderError;
use crate::pipeline::fetch::PoliteFetcher;
use crate::traits::{Clock, PageFetcher, PageParser};

/// Result of asking the paginator for its next page
#[derive(Debug)]
pub enum PageOutcome {
    /// A page with at least one candidate
    Page { page: u32, url: String, candidates: Vec<Candidate> },
    /// No more pages for this query. `exhausted` means the site has no more
    /// results for the keyword, as opposed to hitting the query's page window.
    Finished { exhausted: bool },
    /// The query was given up after a failed fetch or an unreadable page
    Abandoned { page: u32, error: FinderError },
}

#[derive(Debug, Clone)]
pub struct ListingPaginator {
    query: Query,
    next_page: u32,
    finished: Option<bool>,
}

impl ListingPaginator {
    pub fn new(query: Query) -> Self {
        let next_page = query.first_page;
        Self { query, next_page, finished: None }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Fetch and parse the next page
    ///
    /// Stops on an empty page, a page without continuation, or the end of the
    /// query's page window. Once finished no further fetch is issued.
    pub async fn next_page<F, P, C>(
        &mut self,
        site: &SiteConfig,
        parser: &P,
        fetch: &mut PoliteFetcher<'_, F, C>,
    ) -> PageOutcome
    where
        F: PageFetcher,
        P: PageParser,
        C: Clock,
    {
        if let Some(exhausted) = self.finished {
            return PageOutcome::Finished { exhausted };
        }
        if self.next_page > self.query.last_page {
            return self.finish(false);
        }

        let page = self.next_page;
        let url = match site.listing_url(&self.query.keyword, page) {
            Ok(url) => url.to_string(),
            Err(error) => return self.abandon(page, error),
        };

        let body = match fetch.fetch(&url).await {
            Ok(body) => body,
            Err(error) => return self.abandon(page, error),
        };

        let listing = match parser.parse_listing(&body, &url) {
            Ok(listing) => listing,
            Err(error) => return self.abandon(page, error),
        };

        if listing.candidates.is_empty() {
            return self.finish(true);
        }

        self.next_page += 1;
        if !listing.has_more {
            self.finished = Some(true);
        }
        PageOutcome::Page { page, url, candidates: listing.candidates }
    }

    fn finish(&mut self, exhausted: bool) -> PageOutcome {
        self.finished = Some(exhausted);
        PageOutcome::Finished { exhausted }
    }

    fn abandon(&mut self, page: u32, error: FinderError) -> PageOutcome {
        self.finished = Some(false);
        PageOutcome::Abandoned { page, error }
    }
}
