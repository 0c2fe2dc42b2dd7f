//! Output module for benchmark reports and sweep summaries
//!
//! This module handles:
//! - Timing a crawl and producing its `BenchmarkReport`
//! - Writing reports as JSON lines
//! - Summarizing a sweep as a console table or markdown

mod report;
mod summary;

pub use report::{load_reports, BenchmarkReport, MetricsCollector, LANGUAGE};
pub use summary::{
    format_markdown_summary, generate_markdown_summary, print_summary, SummaryRow, SweepSummary,
};
