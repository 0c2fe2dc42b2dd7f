//! Per-run benchmark reports
//!
//! A `MetricsCollector` times one crawl and turns its outcome into a
//! `BenchmarkReport`, the record every run emits as one JSON line.

use crate::crawler::CrawlOutcome;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

/// Language label carried by every report
pub const LANGUAGE: &str = "Rust";

/// Throughput record for one crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub language: String,
    pub concurrency_model: String,
    pub thread_count: usize,
    pub pages_crawled: usize,
    pub total_time_seconds: f64,
    pub pages_per_second: f64,
}

impl BenchmarkReport {
    /// Builds a report, deriving throughput from the page count and duration
    ///
    /// Time is rounded to 4 decimals and throughput to 2. A zero duration
    /// yields a throughput of 0.
    pub fn new(
        concurrency_model: impl Into<String>,
        thread_count: usize,
        pages_crawled: usize,
        elapsed: Duration,
    ) -> Self {
        let seconds = elapsed.as_secs_f64();
        let pages_per_second = if seconds > 0.0 {
            pages_crawled as f64 / seconds
        } else {
            0.0
        };

        Self {
            language: LANGUAGE.to_string(),
            concurrency_model: concurrency_model.into(),
            thread_count,
            pages_crawled,
            total_time_seconds: round_to(seconds, 4),
            pages_per_second: round_to(pages_per_second, 2),
        }
    }

    /// Serializes the report as a single JSON line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Appends the report as one JSON line to `path`, creating the file if needed
    pub fn append_to(&self, path: &Path) -> Result<()> {
        let line = self.to_json_line()?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Wall-clock timer for one crawl
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    started: Instant,
}

impl MetricsCollector {
    /// Starts the clock
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stops the clock and reports on the finished crawl
    pub fn finish(&self, outcome: &CrawlOutcome) -> BenchmarkReport {
        let elapsed = self.elapsed();
        tracing::debug!(
            "{} with {} worker(s): {} pages in {:?}",
            outcome.policy,
            outcome.workers,
            outcome.pages_crawled,
            elapsed
        );
        BenchmarkReport::new(
            outcome.policy.as_str(),
            outcome.workers,
            outcome.pages_crawled,
            elapsed,
        )
    }
}

/// Reads every report from a JSON-lines file, skipping blank lines
pub fn load_reports(path: &Path) -> Result<Vec<BenchmarkReport>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
