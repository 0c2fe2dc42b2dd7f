//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a paginated site and run the real
//! blocking HTTP fetcher against it. The crawl itself runs on a blocking
//! thread so the mock server keeps serving on the tokio runtime.

use frontier_bench::benchmark::{run_plan, BenchmarkPlan};
use frontier_bench::config::{load_config, Config, CrawlConfig};
use frontier_bench::crawler::{
    run_crawl, Coordinator, CrawlOutcome, HtmlPageParser, HttpFetcher, SchedulingPolicy,
};
use frontier_bench::output::SweepSummary;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALL_POLICIES: [SchedulingPolicy; 3] = [
    SchedulingPolicy::Sequential,
    SchedulingPolicy::WorkerPool,
    SchedulingPolicy::GenerationalWave,
];

/// Page body with one data row (close = 1.5) and an optional "Next" link
fn page_body(next: Option<usize>) -> String {
    let link = next
        .map(|i| format!(r#"<a href="page_{}.html">Next</a>"#, i))
        .unwrap_or_default();
    format!(
        r#"<html><head><title>Quotes</title></head><body>
        <table>
            <tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th></tr>
            <tr><td>2024-01-02</td><td>1.0</td><td>2.0</td><td>0.5</td><td>1.5</td></tr>
        </table>
        <a href="index.html">Home</a>
        {}
        </body></html>"#,
        link
    )
}

/// Mounts `count` chained pages; the last page has no "Next" link
async fn mount_chain(server: &MockServer, count: usize) {
    for i in 0..count {
        let next = (i + 1 < count).then_some(i + 1);
        Mock::given(method("GET"))
            .and(path(format!("/page_{}.html", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page_body(next))
                    .insert_header("content-type", "text/html"),
            )
            .expect(..=1)
            .mount(server)
            .await;
    }
}

fn create_test_config(server: &MockServer, policy: SchedulingPolicy) -> CrawlConfig {
    let mut config = CrawlConfig::new(format!("{}/page_0.html", server.uri()));
    config.max_pages = 50;
    config.workers = 4;
    config.model = policy;
    config.request_timeout_ms = 2000;
    config.idle_backoff_ms = 5;
    config
}

/// Runs a crawl with the real HTTP fetcher off the async runtime
async fn crawl(config: CrawlConfig) -> CrawlOutcome {
    tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(config.request_timeout()).expect("Failed to build client");
        Coordinator::new(config, fetcher, HtmlPageParser::new())
            .expect("Failed to create coordinator")
            .run()
            .expect("Crawl failed")
    })
    .await
    .expect("Crawl thread panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_chain_all_policies() {
    for policy in ALL_POLICIES {
        let mock_server = MockServer::start().await;
        mount_chain(&mock_server, 5).await;

        let outcome = crawl(create_test_config(&mock_server, policy)).await;

        assert_eq!(outcome.pages_crawled, 5, "{}", policy);
        assert_eq!(outcome.visited.len(), 5, "{}", policy);
        assert_eq!(outcome.fetch_failures, 0, "{}", policy);
        assert_eq!(outcome.frontier_remaining, 0, "{}", policy);
        assert_eq!(outcome.aggregate_total, 7.5, "{}", policy);
        for i in 0..5 {
            let url = format!("{}/page_{}.html", mock_server.uri(), i);
            assert!(outcome.visited.contains(&url), "{} missing {}", policy, url);
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_stops_chain() {
    for policy in ALL_POLICIES {
        let mock_server = MockServer::start().await;

        // Mounted first so it takes priority over the chain's page_2
        Mock::given(method("GET"))
            .and(path("/page_2.html"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;
        mount_chain(&mock_server, 5).await;

        let outcome = crawl(create_test_config(&mock_server, policy)).await;

        assert_eq!(outcome.pages_crawled, 2, "{}", policy);
        assert_eq!(outcome.fetch_failures, 1, "{}", policy);
        assert_eq!(outcome.visited.len(), 3, "{}", policy);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timed_out_page_is_not_counted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page_1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_body(Some(2)))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_chain(&mock_server, 3).await;

    let mut config = create_test_config(&mock_server, SchedulingPolicy::WorkerPool);
    config.request_timeout_ms = 300;
    let outcome = crawl(config).await;

    assert_eq!(outcome.pages_crawled, 1);
    assert_eq!(outcome.fetch_failures, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_budget_caps_crawl() {
    for policy in ALL_POLICIES {
        let mock_server = MockServer::start().await;
        mount_chain(&mock_server, 10).await;

        let mut config = create_test_config(&mock_server, policy);
        config.max_pages = 3;
        let outcome = crawl(config).await;

        assert_eq!(outcome.pages_crawled, 3, "{}", policy);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    mount_chain(&mock_server, 4).await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bench.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawl]
starting-url = "{}/page_0.html"
max-pages = 10
workers = 2
model = "generational-wave"
request-timeout-ms = 2000
idle-backoff-ms = 5
"#,
            mock_server.uri()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Failed to load config");
    let outcome = tokio::task::spawn_blocking(move || run_crawl(config.crawl))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.policy, SchedulingPolicy::GenerationalWave);
    assert_eq!(outcome.pages_crawled, 4);
    assert_eq!(outcome.generations, 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sweep_over_http() {
    let mock_server = MockServer::start().await;
    // Every run refetches the chain, so no per-page expectation here
    for i in 0..3 {
        let next = (i + 1 < 3).then_some(i + 1);
        Mock::given(method("GET"))
            .and(path(format!("/page_{}.html", i)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(next)))
            .mount(&mock_server)
            .await;
    }

    let mut config = Config::default_for(format!("{}/page_0.html", mock_server.uri()));
    config.crawl.idle_backoff_ms = 5;
    config.benchmark.models = ALL_POLICIES.to_vec();
    config.benchmark.thread_counts = vec![1, 2];
    config.benchmark.runs = 1;

    let reports = tokio::task::spawn_blocking(move || {
        let fetcher = HttpFetcher::new(config.crawl.request_timeout()).unwrap();
        let plan = BenchmarkPlan::from_config(&config);
        run_plan(&config, &plan, &fetcher, &HtmlPageParser::new(), |_| Ok(())).unwrap()
    })
    .await
    .unwrap();

    // sequential x1, worker-pool x2, generational-wave x2
    assert_eq!(reports.len(), 5);
    assert!(reports.iter().all(|r| r.pages_crawled == 3));
    assert!(reports.iter().all(|r| r.language == "Rust"));

    let summary = SweepSummary::from_reports(&reports);
    assert_eq!(summary.rows.len(), 5);
    assert_eq!(summary.row("worker-pool", 1).unwrap().runs, 1);
}
