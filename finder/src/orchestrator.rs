//! Run orchestrator
//!
//! Drives one collection run through the [`RunPhase`] state machine using the
//! injected services: query planning, listing pagination, detail extraction,
//! classification and durable recording into the result file and the ledger.

use chrono::NaiveDate;
use std::collections::{HashSet, VecDeque};

use shared::{logging, run_debug, run_error, run_info, run_warn, Candidate, FirmId, FirmRecord, RunId, RunResult};

use crate::config::FinderConfig;
use crate::core::classifier::into_record;
use crate::core::{AbortReason, FailureTracker, FieldSet, Ledger, QueryPlanner, RunOutcome, RunPhase, RunStatus};
use crate::error::{FinderError, FinderResult};
use crate::pipeline::{extract_details, ListingPaginator, PageOutcome, PoliteFetcher};
use crate::traits::{Clock, FileSystem, PageFetcher, PageParser};

/// Main orchestrator that coordinates one run at a time
pub struct Orchestrator<F, P, S, C>
where
    F: PageFetcher,
    P: PageParser,
    S: FileSystem,
    C: Clock,
{
    /// Immutable run configuration
    config: FinderConfig,

    /// Injected services
    fetcher: F,
    parser: P,
    file_system: S,
    clock: C,
}

/// Everything a single run mutates
struct RunContext {
    run_id: RunId,
    run_date: NaiveDate,
    ledger: Ledger,
    /// Records written earlier the same day, kept ahead of this run's records
    earlier: Vec<FirmRecord>,
    result: RunResult,
    planner: QueryPlanner,
    paginator: Option<ListingPaginator>,
    pending: VecDeque<Candidate>,
    /// Candidates detail-fetched during this run
    examined: HashSet<FirmId>,
    failures: FailureTracker,
}

impl RunContext {
    fn keyword(&self) -> &str {
        self.paginator.as_ref().map(|p| p.query().keyword.as_str()).unwrap_or_default()
    }

    fn file_records(&self) -> Vec<FirmRecord> {
        self.earlier.iter().chain(self.result.records.iter()).cloned().collect()
    }
}

impl<F, P, S, C> Orchestrator<F, P, S, C>
where
    F: PageFetcher,
    P: PageParser,
    S: FileSystem,
    C: Clock,
{
    /// Create new orchestrator with injected dependencies
    pub fn new(config: FinderConfig, fetcher: F, parser: P, file_system: S, clock: C) -> Self {
        Self { config, fetcher, parser, file_system, clock }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Execute one run to completion
    ///
    /// Returns `Err` only when the run cannot start (unreadable ledger or
    /// result file). Failures after that end the run as
    /// [`RunStatus::Aborted`] with the records collected so far.
    pub async fn run_once(&self) -> FinderResult<RunOutcome> {
        let run_id = RunId::new();
        let run_date = self.clock.now().date_naive();

        run_info!(
            run_id,
            "🔎 Starting run for {} ({} keywords, target {})",
            run_date,
            self.config.keywords.len(),
            self.config.target_count
        );

        let ledger = Ledger::from_entries(self.file_system.load_ledger().await?);
        let earlier = self.file_system.load_run_result(run_date).await?;
        run_debug!(
            run_id,
            "📒 Ledger holds {} firms, {} records already written today",
            ledger.len(),
            earlier.len()
        );

        let mut ctx = RunContext {
            run_id,
            run_date,
            ledger,
            earlier,
            result: RunResult::new(run_date),
            planner: QueryPlanner::new(
                self.config.keywords.clone(),
                self.config.target_count,
                self.config.max_passes,
                self.config.max_pages_per_query,
            ),
            paginator: None,
            pending: VecDeque::new(),
            examined: HashSet::new(),
            failures: FailureTracker::new(self.config.max_consecutive_failures),
        };

        let mut fetch = PoliteFetcher::new(
            &self.fetcher,
            &self.clock,
            run_id,
            self.config.http.retry_policy(),
            self.config.http.pacing_policy(),
            self.config.http.request_timeout(),
        );

        let mut phase = RunPhase::Planning;
        let status = loop {
            phase = match phase {
                RunPhase::Planning => self.plan(&mut ctx),
                RunPhase::Paginating => self.paginate(&mut ctx, &mut fetch).await,
                RunPhase::Extracting(candidate) => self.extract(&mut ctx, &mut fetch, candidate).await,
                RunPhase::Classifying(candidate, fields) => self.classify(&mut ctx, candidate, fields),
                RunPhase::Recording(record) => self.record(&mut ctx, record).await,
                RunPhase::Completed => break RunStatus::Completed,
                RunPhase::Aborted(reason) => break RunStatus::Aborted(reason),
            };
        };

        match &status {
            RunStatus::Completed => {
                logging::log_success(
                    &run_id,
                    &format!(
                        "Run completed: {} new firms, {} requests",
                        ctx.result.len(),
                        fetch.requests()
                    ),
                );
            }
            RunStatus::Aborted(reason) => {
                run_error!(run_id, "🛑 Run aborted after {} new firms: {}", ctx.result.len(), reason);
                self.flush(&ctx).await;
            }
        }

        Ok(RunOutcome { status, result: ctx.result })
    }

    fn plan(&self, ctx: &mut RunContext) -> RunPhase {
        ctx.pending.clear();
        match ctx.planner.next_query(ctx.result.len()) {
            Some(query) => {
                logging::log_progress(
                    &ctx.run_id,
                    "Query",
                    &format!("{} ({}/{} found)", query, ctx.result.len(), self.config.target_count),
                );
                ctx.paginator = Some(ListingPaginator::new(query));
                RunPhase::Paginating
            }
            None => {
                ctx.paginator = None;
                if ctx.result.len() < self.config.target_count {
                    run_info!(
                        ctx.run_id,
                        "Sources exhausted after pass {} with {}/{} firms",
                        ctx.planner.current_pass() + 1,
                        ctx.result.len(),
                        self.config.target_count
                    );
                }
                RunPhase::Completed
            }
        }
    }

    async fn paginate(&self, ctx: &mut RunContext, fetch: &mut PoliteFetcher<'_, F, C>) -> RunPhase {
        while let Some(candidate) = ctx.pending.pop_front() {
            if ctx.ledger.contains(&candidate.id) {
                run_debug!(ctx.run_id, "Skipping {}: already in ledger", candidate.id);
                continue;
            }
            if !ctx.examined.insert(candidate.id.clone()) {
                run_debug!(ctx.run_id, "Skipping {}: already examined this run", candidate.id);
                continue;
            }
            return RunPhase::Extracting(candidate);
        }

        let Some(paginator) = ctx.paginator.as_mut() else {
            return RunPhase::Planning;
        };

        match paginator.next_page(&self.config.site, &self.parser, fetch).await {
            PageOutcome::Page { page, url, candidates } => {
                run_debug!(
                    ctx.run_id,
                    keyword = %paginator.query().keyword,
                    page = page,
                    url = %url,
                    "📄 Listing page yielded {} candidates",
                    candidates.len()
                );
                ctx.pending.extend(candidates);
                RunPhase::Paginating
            }
            PageOutcome::Finished { exhausted } => {
                if exhausted {
                    run_debug!(ctx.run_id, "No more results for '{}'", paginator.query().keyword);
                    ctx.planner.mark_exhausted(paginator.query());
                }
                RunPhase::Planning
            }
            PageOutcome::Abandoned { page, error } => {
                run_warn!(
                    ctx.run_id,
                    keyword = %paginator.query().keyword,
                    page = page,
                    "⚠️ Abandoning query: {}",
                    error
                );
                self.count_failure(ctx).unwrap_or(RunPhase::Planning)
            }
        }
    }

    async fn extract(
        &self,
        ctx: &mut RunContext,
        fetch: &mut PoliteFetcher<'_, F, C>,
        candidate: Candidate,
    ) -> RunPhase {
        match extract_details(&candidate, &self.parser, fetch).await {
            Ok(fields) => RunPhase::Classifying(candidate, fields),
            Err(error) => {
                run_warn!(
                    ctx.run_id,
                    keyword = %ctx.keyword(),
                    url = %candidate.url,
                    "⚠️ Skipping {}: {}",
                    candidate.id,
                    error
                );
                self.count_failure(ctx).unwrap_or(RunPhase::Paginating)
            }
        }
    }

    fn classify(&self, ctx: &mut RunContext, candidate: Candidate, fields: FieldSet) -> RunPhase {
        match into_record(&candidate, fields, ctx.keyword(), ctx.run_date) {
            Ok(record) => RunPhase::Recording(record),
            Err(verdict) => {
                run_debug!(ctx.run_id, url = %candidate.url, "Rejected {}: {:?}", candidate.id, verdict);
                RunPhase::Paginating
            }
        }
    }

    async fn record(&self, ctx: &mut RunContext, record: FirmRecord) -> RunPhase {
        let id = record.id.clone();
        let name = record.name.clone();

        // A firm only enters the result once its ledger entry is durable
        ctx.ledger.record(id.clone(), self.clock.now().date_naive());
        if let Err(error) = self.file_system.persist_ledger(&ctx.ledger.entries()).await {
            return persistence_abort(ctx, error);
        }

        ctx.result.push(record);
        if let Err(error) = self.file_system.write_run_result(ctx.run_date, &ctx.file_records()).await {
            return persistence_abort(ctx, error);
        }

        ctx.failures.reset();
        run_info!(
            ctx.run_id,
            "✅ Recorded {} '{}' ({}/{})",
            id,
            name,
            ctx.result.len(),
            self.config.target_count
        );

        if ctx.result.len() >= self.config.target_count {
            RunPhase::Completed
        } else {
            RunPhase::Paginating
        }
    }

    /// Count a skip-path failure; returns the abort phase once over threshold
    fn count_failure(&self, ctx: &mut RunContext) -> Option<RunPhase> {
        if ctx.failures.record_failure() {
            Some(RunPhase::Aborted(AbortReason::ConsecutiveFailures { count: ctx.failures.count() }))
        } else {
            None
        }
    }

    /// Best-effort write of the collected records after an abort
    async fn flush(&self, ctx: &RunContext) {
        let records = ctx.file_records();
        if records.is_empty() {
            return;
        }
        match self.file_system.write_run_result(ctx.run_date, &records).await {
            Ok(path) => run_info!(ctx.run_id, "💾 Flushed {} records to {}", records.len(), path.display()),
            Err(error) => logging::log_error("Flushing run result", &error),
        }
    }
}

fn persistence_abort(ctx: &RunContext, error: FinderError) -> RunPhase {
    run_error!(ctx.run_id, "❌ Persistence failed: {}", error);
    RunPhase::Aborted(AbortReason::Persistence { message: error.to_string() })
}
