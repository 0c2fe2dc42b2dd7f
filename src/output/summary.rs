//! Sweep summary generation
//!
//! Groups the reports of a benchmark sweep by (model, thread count), averages
//! them over runs and derives the speedup of each row relative to the same
//! model at its smallest thread count. Rendered as a console table and as
//! markdown.

use crate::output::BenchmarkReport;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One (model, thread count) cell of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub concurrency_model: String,
    pub thread_count: usize,

    /// Number of reports averaged into this row
    pub runs: usize,

    pub avg_pages_crawled: f64,
    pub avg_time_seconds: f64,
    pub avg_pages_per_second: f64,

    /// Baseline average time divided by this row's average time
    ///
    /// `None` when either time is zero.
    pub speedup: Option<f64>,
}

/// Averaged results of a sweep, ordered by model (first appearance) then thread count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    pub rows: Vec<SummaryRow>,
}

impl SweepSummary {
    /// Builds the summary from individual run reports
    pub fn from_reports(reports: &[BenchmarkReport]) -> Self {
        let mut models: Vec<&str> = Vec::new();
        for report in reports {
            if !models.contains(&report.concurrency_model.as_str()) {
                models.push(report.concurrency_model.as_str());
            }
        }

        let mut rows = Vec::new();
        for model in models {
            let mut thread_counts: Vec<usize> = reports
                .iter()
                .filter(|r| r.concurrency_model == model)
                .map(|r| r.thread_count)
                .collect();
            thread_counts.sort_unstable();
            thread_counts.dedup();

            let mut baseline: Option<f64> = None;
            for threads in thread_counts {
                let group: Vec<&BenchmarkReport> = reports
                    .iter()
                    .filter(|r| r.concurrency_model == model && r.thread_count == threads)
                    .collect();
                let runs = group.len();
                let avg = |f: fn(&BenchmarkReport) -> f64| {
                    group.iter().map(|r| f(r)).sum::<f64>() / runs as f64
                };

                let avg_time_seconds = avg(|r| r.total_time_seconds);
                let base = *baseline.get_or_insert(avg_time_seconds);
                let speedup = (base > 0.0 && avg_time_seconds > 0.0)
                    .then(|| base / avg_time_seconds);

                rows.push(SummaryRow {
                    concurrency_model: model.to_string(),
                    thread_count: threads,
                    runs,
                    avg_pages_crawled: avg(|r| r.pages_crawled as f64),
                    avg_time_seconds,
                    avg_pages_per_second: avg(|r| r.pages_per_second),
                    speedup,
                });
            }
        }

        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a given model and thread count
    pub fn row(&self, model: &str, thread_count: usize) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|row| row.concurrency_model == model && row.thread_count == thread_count)
    }
}

/// Prints the summary to stdout as an aligned table
pub fn print_summary(summary: &SweepSummary) {
    println!("=== Benchmark Summary ===\n");

    if summary.is_empty() {
        println!("No runs recorded.");
        return;
    }

    println!(
        "{:<20} {:>7} {:>5} {:>8} {:>10} {:>10} {:>8}",
        "Model", "Threads", "Runs", "Pages", "Time (s)", "Pages/s", "Speedup"
    );
    for row in &summary.rows {
        println!(
            "{:<20} {:>7} {:>5} {:>8.1} {:>10.4} {:>10.2} {:>8}",
            row.concurrency_model,
            row.thread_count,
            row.runs,
            row.avg_pages_crawled,
            row.avg_time_seconds,
            row.avg_pages_per_second,
            format_speedup(row.speedup)
        );
    }
}

/// Writes the markdown rendering of the summary to `output_path`
///
/// # Arguments
///
/// * `summary` - The sweep summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(HarnessError::Io)` - Failed to write summary
pub fn generate_markdown_summary(summary: &SweepSummary, output_path: &Path) -> Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a sweep summary as markdown
pub fn format_markdown_summary(summary: &SweepSummary) -> String {
    let mut md = String::new();

    md.push_str("# Frontier-Bench Summary\n\n");

    if summary.is_empty() {
        md.push_str("No runs recorded.\n");
        return md;
    }

    let total_runs: usize = summary.rows.iter().map(|row| row.runs).sum();
    md.push_str(&format!("- **Language**: {}\n", crate::output::LANGUAGE));
    md.push_str(&format!("- **Total runs**: {}\n\n", total_runs));

    md.push_str("## Results\n\n");
    md.push_str("| Model | Threads | Runs | Avg Pages | Avg Time (s) | Avg Pages/s | Speedup |\n");
    md.push_str("|-------|---------|------|-----------|--------------|-------------|---------|\n");
    for row in &summary.rows {
        md.push_str(&format!(
            "| {} | {} | {} | {:.1} | {:.4} | {:.2} | {} |\n",
            row.concurrency_model,
            row.thread_count,
            row.runs,
            row.avg_pages_crawled,
            row.avg_time_seconds,
            row.avg_pages_per_second,
            format_speedup(row.speedup)
        ));
    }

    md
}

fn format_speedup(speedup: Option<f64>) -> String {
    match speedup {
        Some(value) => format!("{:.2}x", value),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn report(model: &str, threads: usize, millis: u64) -> BenchmarkReport {
        BenchmarkReport::new(model, threads, 100, Duration::from_millis(millis))
    }

    #[test]
    fn test_groups_and_averages_runs() {
        let reports = vec![
            report("worker-pool", 1, 1000),
            report("worker-pool", 1, 2000),
            report("worker-pool", 4, 500),
        ];
        let summary = SweepSummary::from_reports(&reports);

        assert_eq!(summary.rows.len(), 2);
        let base = summary.row("worker-pool", 1).unwrap();
        assert_eq!(base.runs, 2);
        assert_eq!(base.avg_time_seconds, 1.5);
        assert_eq!(base.avg_pages_per_second, 75.0);
        assert_eq!(base.avg_pages_crawled, 100.0);
        assert_eq!(base.speedup, Some(1.0));

        let fast = summary.row("worker-pool", 4).unwrap();
        assert_eq!(fast.speedup, Some(3.0));
    }

    #[test]
    fn test_speedup_baseline_is_per_model() {
        let reports = vec![
            report("sequential", 1, 2000),
            report("generational-wave", 8, 400),
            report("generational-wave", 2, 800),
        ];
        let summary = SweepSummary::from_reports(&reports);

        let models: Vec<_> = summary
            .rows
            .iter()
            .map(|row| (row.concurrency_model.as_str(), row.thread_count))
            .collect();
        assert_eq!(
            models,
            vec![
                ("sequential", 1),
                ("generational-wave", 2),
                ("generational-wave", 8)
            ]
        );
        assert_eq!(summary.row("sequential", 1).unwrap().speedup, Some(1.0));
        assert_eq!(
            summary.row("generational-wave", 8).unwrap().speedup,
            Some(2.0)
        );
    }

    #[test]
    fn test_zero_time_has_no_speedup() {
        let reports = vec![report("sequential", 1, 0)];
        let summary = SweepSummary::from_reports(&reports);
        assert_eq!(summary.rows[0].speedup, None);
    }

    #[test]
    fn test_empty_summary() {
        let summary = SweepSummary::from_reports(&[]);
        assert!(summary.is_empty());
        assert!(format_markdown_summary(&summary).contains("No runs recorded"));
    }

    #[test]
    fn test_markdown_table() {
        let reports = vec![report("worker-pool", 1, 1000), report("worker-pool", 2, 500)];
        let md = format_markdown_summary(&SweepSummary::from_reports(&reports));

        assert!(md.contains("# Frontier-Bench Summary"));
        assert!(md.contains("- **Total runs**: 2"));
        assert!(md.contains("| worker-pool | 1 | 1 | 100.0 | 1.0000 | 100.00 | 1.00x |"));
        assert!(md.contains("| worker-pool | 2 | 1 | 100.0 | 0.5000 | 200.00 | 2.00x |"));
    }

    #[test]
    fn test_generate_markdown_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("summary.md");
        let summary = SweepSummary::from_reports(&[report("sequential", 1, 250)]);

        generate_markdown_summary(&summary, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format_markdown_summary(&summary));
    }
}
