use crate::config::types::{BenchmarkConfig, Config, CrawlConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on worker threads for a single crawl
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_benchmark_config(&config.benchmark)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_starting_url(&config.starting_url)?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    validate_worker_count("workers", config.workers)?;

    if config.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be >= 1ms".to_string(),
        ));
    }

    if config.idle_backoff_ms < 1 {
        return Err(ConfigError::Validation(
            "idle_backoff_ms must be >= 1ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates the sweep parameters
fn validate_benchmark_config(config: &BenchmarkConfig) -> Result<(), ConfigError> {
    if config.models.is_empty() {
        return Err(ConfigError::Validation(
            "benchmark models cannot be empty".to_string(),
        ));
    }

    if config.thread_counts.is_empty() {
        return Err(ConfigError::Validation(
            "benchmark thread_counts cannot be empty".to_string(),
        ));
    }

    for &count in &config.thread_counts {
        validate_worker_count("thread_counts", count)?;
    }

    if config.runs < 1 {
        return Err(ConfigError::Validation(format!(
            "benchmark runs must be >= 1, got {}",
            config.runs
        )));
    }

    Ok(())
}

fn validate_worker_count(field: &str, count: usize) -> Result<(), ConfigError> {
    if count < 1 || count > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            field, MAX_WORKERS, count
        )));
    }
    Ok(())
}

/// Validates the seed URL
///
/// The seed must be an http(s) URL, and it must contain a path separator
/// after the host so that same-directory resolution has a directory to work
/// with.
fn validate_starting_url(starting_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(starting_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid starting_url '{}': {}", starting_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "starting_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "starting_url has no host: '{}'",
            starting_url
        )));
    }

    let after_scheme = starting_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(starting_url);
    if !after_scheme.contains('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "starting_url must include a path, got '{}'",
            starting_url
        )));
    }

    Ok(())
}
