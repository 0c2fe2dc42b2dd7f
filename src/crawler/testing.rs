//! In-memory site used by the crawler unit tests

use crate::crawler::PageFetcher;
use crate::FetchError;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub const HOST: &str = "http://h/";

pub fn page_url(index: usize) -> String {
    format!("{}page_{}.html", HOST, index)
}

/// Page body with a data table (close column = `close`) and an optional "Next" link
pub fn page_html(close: f64, next: Option<&str>) -> String {
    let link = next
        .map(|href| format!(r#"<a href="{}">Next</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <table>
                <tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th></tr>
                <tr><td>d</td><td>1</td><td>2</td><td>0</td><td>{}</td></tr>
            </table>
            {}
        </body></html>"#,
        close, link
    )
}

/// Fetcher over a fixed map of pages
///
/// Unknown URLs and URLs marked failing produce a transport error. Every
/// fetch is counted per URL.
#[derive(Debug, Default)]
pub struct StaticSite {
    pages: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    fetches: Mutex<HashMap<String, usize>>,
    delay: Duration,
}

impl StaticSite {
    /// `count` pages, each linking to the next; the last has no link
    pub fn chain(count: usize) -> Self {
        let mut site = Self::default();
        for i in 0..count {
            let next = (i + 1 < count).then(|| format!("page_{}.html", i + 1));
            site.insert(page_url(i), page_html(1.0, next.as_deref()));
        }
        site
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.pages.insert(url.into(), body.into());
    }

    pub fn fail(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Makes every fetch sleep, widening race windows between workers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

impl PageFetcher for StaticSite {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if self.failing.contains(url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
