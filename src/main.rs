//! Frontier-Bench main entry point
//!
//! This is the command-line interface for the Frontier-Bench crawl harness.
//! Reports go to stdout as JSON lines; logs go to stderr.

use anyhow::{bail, Context};
use clap::Parser;
use frontier_bench::benchmark::{run_plan, BenchmarkPlan};
use frontier_bench::config::{load_config_with_hash, validate, Config};
use frontier_bench::crawler::{Coordinator, HtmlPageParser, HttpFetcher, SchedulingPolicy};
use frontier_bench::output::{
    generate_markdown_summary, print_summary, BenchmarkReport, MetricsCollector, SweepSummary,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Frontier-Bench: crawl throughput under three scheduling models
///
/// Crawls a paginated site by following "Next" links from a seed URL, under
/// a sequential, worker-pool or generational-wave scheduler, and reports
/// pages per second.
#[derive(Parser, Debug)]
#[command(name = "frontier-bench")]
#[command(version)]
#[command(about = "Frontier-based crawl benchmark harness", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed URL (required without --config)
    #[arg(long, value_name = "URL", required_unless_present = "config")]
    url: Option<String>,

    /// Maximum number of pages to crawl
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of worker threads
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Scheduling model for a single crawl
    #[arg(long, value_enum)]
    model: Option<SchedulingPolicy>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,

    /// Run every configured model and thread count and print a summary
    #[arg(long)]
    sweep: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "sweep")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.sweep {
        handle_sweep(&config)?;
    } else {
        handle_crawl(&config)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("frontier_bench=info,warn"),
            1 => EnvFilter::new("frontier_bench=debug,info"),
            2 => EnvFilter::new("frontier_bench=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(verbose >= 2)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies CLI overrides and validates the result
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => match &cli.url {
            Some(url) => Config::default_for(url.as_str()),
            None => bail!("either --config or --url is required"),
        },
    };

    if let Some(url) = &cli.url {
        config.crawl.starting_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(workers) = cli.workers {
        config.crawl.workers = workers;
    }
    if let Some(model) = cli.model {
        config.crawl.model = model;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.crawl.request_timeout_ms = timeout_ms;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Frontier-Bench Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Starting URL: {}", config.crawl.starting_url);
    println!("  Max pages: {}", config.crawl.max_pages);
    println!("  Workers: {}", config.crawl.workers);
    println!("  Model: {}", config.crawl.model);
    println!("  Request timeout: {}ms", config.crawl.request_timeout_ms);
    println!("  Idle backoff: {}ms", config.crawl.idle_backoff_ms);
    println!("  Table column: {}", config.crawl.table_column);

    let plan = BenchmarkPlan::from_config(config);
    println!("\nBenchmark Sweep ({} runs each):", plan.runs);
    for case in &plan.cases {
        println!("  - {} x {} thread(s)", case.policy, case.workers);
    }

    println!("\nOutput:");
    println!(
        "  Reports: {}",
        config.output.report_path.as_deref().unwrap_or("(stdout only)")
    );
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("(none)")
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would run {} crawl(s) with --sweep, 1 without",
        plan.total_runs()
    );
}

/// Handles a single crawl with the configured model
fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(config.crawl.request_timeout())
        .context("Failed to build HTTP client")?;
    let coordinator = Coordinator::new(config.crawl.clone(), fetcher, HtmlPageParser::new())?;

    let collector = MetricsCollector::start();
    let outcome = coordinator.run().context("Crawl failed")?;
    let report = collector.finish(&outcome);

    tracing::info!(
        "{} pages crawled ({} fetch failures, aggregate {:.2})",
        outcome.pages_crawled,
        outcome.fetch_failures,
        outcome.aggregate_total
    );
    emit_report(config, &report).context("Failed to emit report")
}

/// Handles the --sweep mode: every model and thread count, then a summary
fn handle_sweep(config: &Config) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(config.crawl.request_timeout())
        .context("Failed to build HTTP client")?;
    let plan = BenchmarkPlan::from_config(config);

    let reports = run_plan(config, &plan, &fetcher, &HtmlPageParser::new(), |report| {
        emit_report(config, report)
    })
    .context("Benchmark sweep failed")?;

    let summary = SweepSummary::from_reports(&reports);
    println!();
    print_summary(&summary);

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&summary, Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    Ok(())
}

/// Prints a report as one JSON line and appends it to the report file, if any
fn emit_report(config: &Config, report: &BenchmarkReport) -> frontier_bench::Result<()> {
    println!("{}", report.to_json_line()?);

    if let Some(path) = &config.output.report_path {
        report.append_to(Path::new(path))?;
    }

    Ok(())
}
