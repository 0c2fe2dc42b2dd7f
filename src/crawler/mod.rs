//! Crawler module for frontier-based page crawling
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier (pending queue, visited set, page budget)
//! - HTTP fetching with per-request timeouts
//! - HTML parsing for the "Next" link and the table aggregate
//! - Crawl workers and the coordinator that schedules them

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, CrawlOutcome, SchedulingPolicy};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher, USER_AGENT};
pub use frontier::{FrontierStore, TakenUrl, WorkSignal};
pub use parser::{HtmlPageParser, PageParser, PageResult};
pub use worker::{CrawlWorker, PageOutcome, WorkerStats};

use crate::config::CrawlConfig;
use crate::Result;

/// Runs a complete crawl against the live network
///
/// Builds the HTTP fetcher and HTML parser, then runs the policy named in
/// `config.model`.
///
/// # Arguments
///
/// * `config` - Seed, budget, worker count, policy and timeouts
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished (page-level failures included)
/// * `Err(HarnessError)` - The crawl could not be started or a worker panicked
pub fn run_crawl(config: CrawlConfig) -> Result<CrawlOutcome> {
    let fetcher = HttpFetcher::new(config.request_timeout())?;
    Coordinator::new(config, fetcher, HtmlPageParser::new())?.run()
}
