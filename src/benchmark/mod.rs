//! Benchmark sweep runner
//!
//! Expands the `[benchmark]` configuration into a list of (model, thread
//! count) cases and runs each one `runs` times against a fresh frontier,
//! producing one `BenchmarkReport` per crawl.

use crate::config::Config;
use crate::crawler::{Coordinator, PageFetcher, PageParser, SchedulingPolicy};
use crate::output::{BenchmarkReport, MetricsCollector};
use crate::Result;

/// One (model, thread count) combination of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkCase {
    pub policy: SchedulingPolicy,
    pub workers: usize,
}

/// Ordered list of cases plus the repetition count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkPlan {
    pub cases: Vec<BenchmarkCase>,
    pub runs: usize,
}

impl BenchmarkPlan {
    /// Builds the plan from the `[benchmark]` section
    ///
    /// The sequential model ignores parallelism, so it contributes a single
    /// one-thread case no matter how many thread counts are configured.
    pub fn from_config(config: &Config) -> Self {
        let mut cases = Vec::new();
        for &policy in &config.benchmark.models {
            let thread_counts: &[usize] = match policy {
                SchedulingPolicy::Sequential => &[1],
                _ => &config.benchmark.thread_counts,
            };
            for &workers in thread_counts {
                let case = BenchmarkCase { policy, workers };
                if !cases.contains(&case) {
                    cases.push(case);
                }
            }
        }

        Self {
            cases,
            runs: config.benchmark.runs,
        }
    }

    /// Total number of crawls the plan performs
    pub fn total_runs(&self) -> usize {
        self.cases.len() * self.runs
    }
}

/// Runs every case of the plan, in order
///
/// # Arguments
///
/// * `config` - Supplies the crawl settings shared by all cases
/// * `plan` - Cases and repetitions to run
/// * `fetcher` - Page fetch capability shared by every crawl
/// * `parser` - Page parse capability shared by every crawl
/// * `on_report` - Called with each report as soon as its crawl finishes
///
/// # Returns
///
/// * `Ok(Vec<BenchmarkReport>)` - One report per crawl, in run order
/// * `Err(HarnessError)` - A crawl could not run or `on_report` failed
pub fn run_plan<F, P>(
    config: &Config,
    plan: &BenchmarkPlan,
    fetcher: &F,
    parser: &P,
    mut on_report: impl FnMut(&BenchmarkReport) -> Result<()>,
) -> Result<Vec<BenchmarkReport>>
where
    F: PageFetcher,
    P: PageParser,
{
    tracing::info!(
        "Running benchmark plan: {} case(s) x {} run(s)",
        plan.cases.len(),
        plan.runs
    );

    let mut reports = Vec::with_capacity(plan.total_runs());
    for case in &plan.cases {
        let mut settings = config.crawl.clone();
        settings.model = case.policy;
        settings.workers = case.workers;
        let coordinator = Coordinator::new(settings, fetcher, parser)?;

        for run in 1..=plan.runs {
            tracing::info!(
                "Benchmark {} with {} thread(s), run {}/{}",
                case.policy,
                case.workers,
                run,
                plan.runs
            );

            let collector = MetricsCollector::start();
            let outcome = coordinator.run()?;
            let report = collector.finish(&outcome);

            on_report(&report)?;
            reports.push(report);
        }
    }

    Ok(reports)
}
