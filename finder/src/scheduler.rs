//! Daily scheduling for daemon mode
//!
//! Sleeps until the next trigger time on the injected clock, runs the job to
//! completion, then goes back to sleep. Runs never overlap and a failed run
//! never stops the loop.

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use std::future::Future;

use shared::logging;

use crate::core::{RunOutcome, RunStatus};
use crate::error::FinderResult;
use crate::traits::Clock;

pub struct Scheduler<C: Clock> {
    clock: C,
    at: NaiveTime,
    run_on_start: bool,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, at: NaiveTime, run_on_start: bool) -> Self {
        Self { clock, at, run_on_start }
    }

    /// Next trigger strictly after `now`: today at the trigger time if still
    /// ahead, otherwise tomorrow
    pub fn next_trigger(&self, now: DateTime<Local>) -> DateTime<Local> {
        let today = now.date_naive();
        match local_at(today, self.at) {
            Some(trigger) if trigger > now => trigger,
            _ => today
                .succ_opt()
                .and_then(|tomorrow| local_at(tomorrow, self.at))
                .unwrap_or_else(|| now + chrono::Duration::days(1)),
        }
    }

    /// Run `job` on schedule; `max_runs` bounds the loop, `None` runs forever
    ///
    /// Returns the number of runs executed.
    pub async fn run<J, Fut>(&self, mut job: J, max_runs: Option<usize>) -> usize
    where
        J: FnMut() -> Fut,
        Fut: Future<Output = FinderResult<RunOutcome>>,
    {
        let more = |runs: usize| max_runs.map_or(true, |max| runs < max);
        let mut runs = 0;

        if self.run_on_start && more(runs) {
            Self::execute(&mut job).await;
            runs += 1;
        }

        while more(runs) {
            let now = self.clock.now();
            let next = self.next_trigger(now);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!(
                timestamp = logging::format_timestamp(),
                "⏰ Next run at {} (in {}m)",
                next.format("%Y-%m-%d %H:%M"),
                wait.as_secs() / 60
            );
            self.clock.sleep(wait).await;

            Self::execute(&mut job).await;
            runs += 1;
        }
        runs
    }

    async fn execute<J, Fut>(job: &mut J)
    where
        J: FnMut() -> Fut,
        Fut: Future<Output = FinderResult<RunOutcome>>,
    {
        match job().await {
            Ok(outcome) => match outcome.status {
                RunStatus::Completed => {
                    tracing::info!(timestamp = logging::format_timestamp(), "Scheduled run finished with {} firms", outcome.result.len())
                }
                RunStatus::Aborted(reason) => {
                    tracing::warn!(timestamp = logging::format_timestamp(), "Scheduled run aborted: {}", reason)
                }
            },
            Err(error) => logging::log_error("Scheduled run", &error),
        }
    }
}

fn local_at(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    date.and_time(time).and_local_timezone(Local).earliest()
}
