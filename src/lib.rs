//! Frontier-Bench: a crawl-engine benchmark harness
//!
//! This crate crawls a paginated site by following each page's "Next" link,
//! driving the same frontier-based crawl loop under three scheduling
//! disciplines (sequential, worker pool, generational wave) and reporting
//! throughput for each.

pub mod benchmark;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Frontier-Bench operations
///
/// Page-level failures (fetch, parse, resolve) never surface here: workers
/// recover from them locally. Only problems that prevent a crawl from
/// running at all, or that break a worker thread, end up as a `HarnessError`.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid crawl settings: {0}")]
    InvalidSettings(String),

    #[error("Crawl worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport-level failure while fetching one page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// The page bytes could not be turned into a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Document is empty")]
    EmptyDocument,
}

/// A discovered link could not be made absolute
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Base URL has no path separator: {0}")]
    MissingSeparator(String),

    #[error("Link is empty")]
    EmptyLink,
}

/// Result type alias for Frontier-Bench operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome, FrontierStore, SchedulingPolicy};
pub use output::BenchmarkReport;
pub use state::WorkerState;
pub use url::resolve_link;
