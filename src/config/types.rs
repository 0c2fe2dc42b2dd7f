use crate::crawler::SchedulingPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Frontier-Bench
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with every default except the seed URL
    pub fn default_for(starting_url: impl Into<String>) -> Self {
        Self {
            crawl: CrawlConfig::new(starting_url),
            benchmark: BenchmarkConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl behavior configuration, fixed for the lifetime of a run
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL; the first page admitted to the frontier
    #[serde(rename = "starting-url")]
    pub starting_url: String,

    /// Maximum number of pages that may be successfully crawled
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Degree of parallelism (ignored by the sequential model)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Scheduling discipline used by a single crawl
    #[serde(default)]
    pub model: SchedulingPolicy,

    /// Timeout applied to every page request (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How long an idle pool worker sleeps before re-checking the frontier (milliseconds)
    #[serde(rename = "idle-backoff-ms", default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,

    /// Zero-based table column summed into the page aggregate
    #[serde(rename = "table-column", default = "default_table_column")]
    pub table_column: usize,
}

impl CrawlConfig {
    /// Creates a crawl configuration with default budget, workers and timeouts
    pub fn new(starting_url: impl Into<String>) -> Self {
        Self {
            starting_url: starting_url.into(),
            max_pages: default_max_pages(),
            workers: default_workers(),
            model: SchedulingPolicy::default(),
            request_timeout_ms: default_request_timeout_ms(),
            idle_backoff_ms: default_idle_backoff_ms(),
            table_column: default_table_column(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }
}

/// Parameter sweep used by `--sweep`
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkConfig {
    /// Scheduling disciplines to compare
    #[serde(default = "default_models")]
    pub models: Vec<SchedulingPolicy>,

    /// Worker counts to try for each parallel model
    #[serde(rename = "thread-counts", default = "default_thread_counts")]
    pub thread_counts: Vec<usize>,

    /// Repetitions of every (model, thread count) pair
    #[serde(default = "default_runs")]
    pub runs: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            thread_counts: default_thread_counts(),
            runs: default_runs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON-lines file that every benchmark report is appended to
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,

    /// Markdown file for the sweep summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

fn default_max_pages() -> usize {
    500
}

fn default_workers() -> usize {
    4
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_idle_backoff_ms() -> u64 {
    10
}

fn default_table_column() -> usize {
    4
}

fn default_models() -> Vec<SchedulingPolicy> {
    vec![
        SchedulingPolicy::Sequential,
        SchedulingPolicy::WorkerPool,
        SchedulingPolicy::GenerationalWave,
    ]
}

fn default_thread_counts() -> Vec<usize> {
    vec![1, 2, 4, 8]
}

fn default_runs() -> usize {
    2
}
