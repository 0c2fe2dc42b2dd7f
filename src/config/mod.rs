//! Configuration module for Frontier-Bench
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use frontier_bench::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bench.toml")).unwrap();
//! println!("Crawl budget: {} pages", config.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BenchmarkConfig, Config, CrawlConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

pub use validation::validate;
