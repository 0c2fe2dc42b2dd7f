//! Crawl worker: the unit of concurrent execution
//!
//! A worker repeatedly takes a URL, fetches and parses it, resolves the
//! "Next" link and offers it back to the frontier. Every failure below the
//! crawl level is absorbed here:
//! - fetch failure: the URL is dropped, nothing is counted or re-queued
//! - parse failure or missing table: no link, aggregate 0.0
//! - resolution failure: the link is not scheduled

use crate::crawler::frontier::{FrontierStore, WorkSignal};
use crate::crawler::{PageFetcher, PageParser, PageResult};
use crate::state::WorkerState;
use crate::url::resolve_link;
use std::time::Duration;

/// Result of processing one URL
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Fetched and counted against the budget
    Crawled {
        /// Absolute URL of the next page, if one was found and resolved
        next: Option<String>,
        /// Table aggregate of the page
        aggregate: f64,
    },

    /// The fetch failed; the URL is abandoned
    FetchFailed,

    /// The fetch succeeded after peers had spent the budget; the page is discarded
    OverBudget,
}

/// Per-worker counters, merged by the coordinator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerStats {
    pub pages_crawled: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub unresolved_links: usize,
    pub links_scheduled: usize,
    pub aggregate_total: f64,
}

impl WorkerStats {
    /// Adds another worker's counters to these
    pub fn merge(&mut self, other: &WorkerStats) {
        self.pages_crawled += other.pages_crawled;
        self.fetch_failures += other.fetch_failures;
        self.parse_failures += other.parse_failures;
        self.unresolved_links += other.unresolved_links;
        self.links_scheduled += other.links_scheduled;
        self.aggregate_total += other.aggregate_total;
    }
}

/// One crawl worker bound to a shared frontier
///
/// The worker itself is owned by a single thread; only the store, fetcher
/// and parser are shared.
pub struct CrawlWorker<'a, F, P> {
    id: usize,
    store: &'a FrontierStore,
    fetcher: &'a F,
    parser: &'a P,
    timeout: Duration,
    table_column: usize,
    state: WorkerState,
    stats: WorkerStats,
}

impl<'a, F: PageFetcher, P: PageParser> CrawlWorker<'a, F, P> {
    /// Creates an idle worker
    ///
    /// # Arguments
    ///
    /// * `id` - Worker number, used in log fields
    /// * `store` - The shared frontier
    /// * `fetcher` - Page fetch capability
    /// * `parser` - Page parse capability
    /// * `timeout` - Timeout for every fetch
    /// * `table_column` - Table column summed into the aggregate
    pub fn new(
        id: usize,
        store: &'a FrontierStore,
        fetcher: &'a F,
        parser: &'a P,
        timeout: Duration,
        table_column: usize,
    ) -> Self {
        Self {
            id,
            store,
            fetcher,
            parser,
            timeout,
            table_column,
            state: WorkerState::Idle,
            stats: WorkerStats::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    pub fn into_stats(self) -> WorkerStats {
        self.stats
    }

    /// Persistent loop used by the sequential and worker-pool policies
    ///
    /// Takes URLs until the frontier reports `Done`. The taken URL stays in
    /// flight until its successor has been offered to the frontier, so an
    /// idle peer never sees "empty and idle" while more work is coming.
    pub fn run(&mut self, backoff: Duration) {
        tracing::debug!(worker = self.id, "Worker started");

        loop {
            let Some(taken) = self.store.take() else {
                match self.store.wait_for_work(backoff) {
                    WorkSignal::Ready => continue,
                    WorkSignal::Done => break,
                }
            };

            if let PageOutcome::Crawled {
                next: Some(next), ..
            } = self.process(&taken)
            {
                self.schedule(next);
            }
            drop(taken);
        }

        tracing::debug!(
            worker = self.id,
            pages = self.stats.pages_crawled,
            failures = self.stats.fetch_failures,
            "Worker finished"
        );
    }

    /// Processes one generation slice for the generational-wave policy
    ///
    /// Discovered links are returned for the coordinator to admit after the
    /// generation barrier instead of being scheduled directly.
    pub fn process_batch(&mut self, urls: &[String]) -> Vec<String> {
        let mut staged = Vec::new();
        for url in urls {
            if self.store.is_exhausted() {
                break;
            }
            if let PageOutcome::Crawled {
                next: Some(next), ..
            } = self.process(url)
            {
                self.transition(WorkerState::Scheduling);
                staged.push(next);
                self.transition(WorkerState::Idle);
            }
        }
        staged
    }

    /// Runs Fetching → Parsing → Resolving for one URL
    ///
    /// The worker ends in `Resolving` when a next URL is returned (the caller
    /// schedules it) and in `Idle` otherwise.
    pub fn process(&mut self, url: &str) -> PageOutcome {
        self.transition(WorkerState::Fetching);
        let body = match self.fetcher.fetch(url, self.timeout) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(worker = self.id, "Fetch failed: {}", e);
                self.stats.fetch_failures += 1;
                self.transition(WorkerState::Idle);
                return PageOutcome::FetchFailed;
            }
        };

        let Some(count) = self.store.record_success() else {
            tracing::debug!(worker = self.id, "Budget spent, discarding {}", url);
            self.transition(WorkerState::Idle);
            return PageOutcome::OverBudget;
        };
        self.stats.pages_crawled += 1;
        tracing::debug!(worker = self.id, count, "Crawled {}", url);

        self.transition(WorkerState::Parsing);
        let page = match self.parser.extract(&body, self.table_column) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(worker = self.id, "Failed to parse {}: {}", url, e);
                self.stats.parse_failures += 1;
                PageResult {
                    next_link: None,
                    aggregate: 0.0,
                }
            }
        };
        self.stats.aggregate_total += page.aggregate;

        self.transition(WorkerState::Resolving);
        let next = page
            .next_link
            .and_then(|link| match resolve_link(url, &link) {
                Ok(absolute) => Some(absolute),
                Err(e) => {
                    tracing::warn!(worker = self.id, "Cannot resolve link on {}: {}", url, e);
                    self.stats.unresolved_links += 1;
                    None
                }
            });

        if next.is_none() {
            self.transition(WorkerState::Idle);
        }

        PageOutcome::Crawled {
            next,
            aggregate: page.aggregate,
        }
    }

    /// Offers a resolved URL to the frontier and returns to `Idle`
    pub fn schedule(&mut self, url: String) -> bool {
        self.transition(WorkerState::Scheduling);
        let admitted = self.store.try_schedule(url.as_str());
        if admitted {
            self.stats.links_scheduled += 1;
            tracing::debug!(worker = self.id, "Scheduled {}", url);
        } else {
            tracing::trace!(worker = self.id, "Not scheduling {}", url);
        }
        self.transition(WorkerState::Idle);
        admitted
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "worker {} cannot go from {} to {}",
            self.id,
            self.state,
            next
        );
        tracing::trace!(worker = self.id, from = %self.state, to = %next, "Worker state");
        self.state = next;
    }
}
