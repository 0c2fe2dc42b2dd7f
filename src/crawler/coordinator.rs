//! Crawler coordinator - crawl orchestration logic
//!
//! This module owns the frontier for one crawl and drives the workers under
//! one of three scheduling disciplines:
//! - Sequential: a single worker loop on the calling thread
//! - Worker pool: N persistent scoped threads sharing the frontier
//! - Generational wave: each frontier generation processed as one parallel
//!   batch, with discovered links admitted after the batch barrier
//!
//! Every policy stops once the budget is spent or the frontier is empty with
//! no work in flight.

use crate::config::CrawlConfig;
use crate::crawler::frontier::FrontierStore;
use crate::crawler::worker::{CrawlWorker, WorkerStats};
use crate::crawler::{PageFetcher, PageParser};
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// Scheduling discipline for a crawl
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingPolicy {
    /// One worker, no concurrency
    Sequential,

    /// Fixed set of persistent workers pulling from the shared frontier
    #[default]
    WorkerPool,

    /// Whole-frontier parallel batches separated by a barrier
    GenerationalWave,
}

impl SchedulingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::WorkerPool => "worker-pool",
            Self::GenerationalWave => "generational-wave",
        }
    }

    /// Number of threads the policy actually uses for `requested` workers
    pub fn effective_workers(&self, requested: usize) -> usize {
        match self {
            Self::Sequential => 1,
            Self::WorkerPool | Self::GenerationalWave => requested.max(1),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything observable about a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub policy: SchedulingPolicy,
    pub workers: usize,
    pub pages_crawled: usize,
    pub visited: HashSet<String>,
    pub frontier_remaining: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub unresolved_links: usize,
    pub aggregate_total: f64,
    /// Generations processed (wave policy only; 0 otherwise)
    pub generations: usize,
    pub elapsed: Duration,
}

/// Main crawl coordinator structure
///
/// Generic over the fetch and parse capabilities so tests can drive the
/// real scheduling logic against an in-memory site.
pub struct Coordinator<F, P> {
    config: CrawlConfig,
    fetcher: F,
    parser: P,
}

impl<F: PageFetcher, P: PageParser> Coordinator<F, P> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Seed, budget, worker count, policy and timeouts
    /// * `fetcher` - Page fetch capability
    /// * `parser` - Page parse capability
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarnessError::InvalidSettings)` - Zero budget or zero workers
    pub fn new(config: CrawlConfig, fetcher: F, parser: P) -> Result<Self> {
        if config.max_pages == 0 {
            return Err(HarnessError::InvalidSettings(
                "max_pages must be at least 1".to_string(),
            ));
        }
        if config.workers == 0 {
            return Err(HarnessError::InvalidSettings(
                "workers must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            config,
            fetcher,
            parser,
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs one crawl with the configured policy
    pub fn run(&self) -> Result<CrawlOutcome> {
        self.run_with(self.config.model)
    }

    /// Runs one crawl with an explicit policy
    ///
    /// A fresh frontier is created for every call, so a coordinator can be
    /// reused across benchmark runs.
    pub fn run_with(&self, policy: SchedulingPolicy) -> Result<CrawlOutcome> {
        let workers = policy.effective_workers(self.config.workers);
        let store = FrontierStore::new(self.config.starting_url.as_str(), self.config.max_pages);

        tracing::info!(
            "Starting {} crawl from {} (budget {}, {} worker(s))",
            policy,
            self.config.starting_url,
            self.config.max_pages,
            workers
        );

        let start_time = Instant::now();
        let (stats, generations) = match policy {
            SchedulingPolicy::Sequential => (self.run_sequential(&store), 0),
            SchedulingPolicy::WorkerPool => (self.run_worker_pool(&store, workers)?, 0),
            SchedulingPolicy::GenerationalWave => self.run_generational_wave(&store, workers)?,
        };
        let elapsed = start_time.elapsed();

        let outcome = CrawlOutcome {
            policy,
            workers,
            pages_crawled: store.pages_crawled(),
            visited: store.visited_snapshot(),
            frontier_remaining: store.frontier_len(),
            fetch_failures: stats.fetch_failures,
            parse_failures: stats.parse_failures,
            unresolved_links: stats.unresolved_links,
            aggregate_total: stats.aggregate_total,
            generations,
            elapsed,
        };

        tracing::info!(
            "Crawl completed: {} pages crawled in {:?} ({} fetch failures, {} visited)",
            outcome.pages_crawled,
            outcome.elapsed,
            outcome.fetch_failures,
            outcome.visited.len()
        );

        Ok(outcome)
    }

    fn worker<'s>(&'s self, id: usize, store: &'s FrontierStore) -> CrawlWorker<'s, F, P> {
        CrawlWorker::new(
            id,
            store,
            &self.fetcher,
            &self.parser,
            self.config.request_timeout(),
            self.config.table_column,
        )
    }

    fn run_sequential(&self, store: &FrontierStore) -> WorkerStats {
        let mut worker = self.worker(0, store);
        worker.run(self.config.idle_backoff());
        worker.into_stats()
    }

    fn run_worker_pool(&self, store: &FrontierStore, workers: usize) -> Result<WorkerStats> {
        let backoff = self.config.idle_backoff();

        let per_worker = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|id| {
                    let mut worker = self.worker(id, store);
                    scope.spawn(move || {
                        worker.run(backoff);
                        worker.into_stats()
                    })
                })
                .collect();

            join_workers(handles)
        })?;

        Ok(per_worker
            .iter()
            .fold(WorkerStats::default(), |mut acc, stats| {
                acc.merge(stats);
                acc
            }))
    }

    fn run_generational_wave(
        &self,
        store: &FrontierStore,
        workers: usize,
    ) -> Result<(WorkerStats, usize)> {
        let mut totals = WorkerStats::default();
        let mut generations = 0;

        loop {
            let generation = store.drain_generation();
            if generation.is_empty() {
                break;
            }
            generations += 1;
            tracing::info!(
                "Generation {}: {} URL(s), {} pages crawled so far",
                generations,
                generation.len(),
                store.pages_crawled()
            );

            let chunk_size = generation.len().div_ceil(workers);
            let results = thread::scope(|scope| {
                let handles: Vec<_> = generation
                    .chunks(chunk_size)
                    .enumerate()
                    .map(|(id, chunk)| {
                        let mut worker = self.worker(id, store);
                        scope.spawn(move || {
                            let staged = worker.process_batch(chunk);
                            (staged, worker.into_stats())
                        })
                    })
                    .collect();

                join_workers(handles)
            })?;

            // Barrier passed: promote discoveries in order
            let mut promoted = 0;
            for (staged, stats) in results {
                totals.merge(&stats);
                for url in staged {
                    if store.try_schedule(url) {
                        promoted += 1;
                    }
                }
            }
            tracing::debug!("Generation {} promoted {} URL(s)", generations, promoted);
        }

        Ok((totals, generations))
    }
}

/// Joins scoped worker threads, mapping a panic to `WorkerPanicked`
fn join_workers<T>(handles: Vec<thread::ScopedJoinHandle<'_, T>>) -> Result<Vec<T>> {
    handles
        .into_iter()
        .enumerate()
        .map(|(worker, handle)| {
            handle
                .join()
                .map_err(|_| HarnessError::WorkerPanicked { worker })
        })
        .collect()
}
