//! Paced, retrying fetch shared by the paginator and the detail extractor

use chrono::{DateTime, Local};
use rand::Rng;
use std::time::Duration;

use shared::{run_debug, run_warn, RunId};

use crate::core::{PacingPolicy, RetryPolicy};
use crate::error::FinderResult;
use crate::traits::{Clock, PageFetcher};

/// Wraps a [`PageFetcher`] with request pacing and bounded exponential backoff
pub struct PoliteFetcher<'a, F, C> {
    fetcher: &'a F,
    clock: &'a C,
    run_id: RunId,
    retry: RetryPolicy,
    pacing: PacingPolicy,
    timeout: Duration,
    last_request: Option<DateTime<Local>>,
    requests: u32,
}

impl<'a, F, C> PoliteFetcher<'a, F, C>
where
    F: PageFetcher,
    C: Clock,
{
    pub fn new(
        fetcher: &'a F,
        clock: &'a C,
        run_id: RunId,
        retry: RetryPolicy,
        pacing: PacingPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            clock,
            run_id,
            retry,
            pacing,
            timeout,
            last_request: None,
            requests: 0,
        }
    }

    /// Fetch `url`, retrying transient failures until the attempt cap
    pub async fn fetch(&mut self, url: &str) -> FinderResult<String> {
        let mut attempt = 0;
        loop {
            self.pace().await;
            self.last_request = Some(self.clock.now());
            self.requests += 1;

            match self.fetcher.fetch(url, self.timeout).await {
                Ok(body) => return Ok(body),
                Err(error) => match self.retry.should_retry(&error, attempt) {
                    Some(delay) => {
                        run_warn!(
                            self.run_id,
                            url = %url,
                            "⏳ Fetch failed (attempt {}/{}): {}, retrying in {}ms",
                            attempt + 1,
                            self.retry.max_attempts,
                            error,
                            delay.as_millis()
                        );
                        self.clock.sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(error),
                },
            }
        }
    }

    /// Number of requests issued, retries included
    pub fn requests(&self) -> u32 {
        self.requests
    }

    async fn pace(&mut self) {
        let mut wait = self.pacing.remaining(self.last_request, self.clock.now());
        if wait.is_zero() {
            return;
        }
        let jitter_ms = self.pacing.jitter.as_millis() as u64;
        if jitter_ms > 0 {
            wait += Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms));
        }
        run_debug!(self.run_id, "Pacing {}ms before next request", wait.as_millis());
        self.clock.sleep(wait).await;
    }
}
