//! HTTP fetcher implementation
//!
//! This module handles all network requests for the crawler:
//! - The `PageFetcher` capability injected into workers
//! - A blocking reqwest-backed implementation with a per-request timeout
//! - Error classification into `FetchError`
//!
//! There is no retry policy: a failed fetch is reported once and the worker
//! abandons the URL.

use crate::FetchError;
use reqwest::blocking::Client;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("frontier-bench/", env!("CARGO_PKG_VERSION"));

/// Fetches raw page bytes for a URL
///
/// Implementations block the calling worker thread and must be shareable
/// between workers.
pub trait PageFetcher: Sync {
    /// Issues one request for `url`, giving up after `timeout`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The response body
    /// * `Err(FetchError)` - Timeout, transport error, or non-success status
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url, timeout)
    }
}

/// Builds a blocking HTTP client with proper configuration
///
/// # Arguments
///
/// * `timeout` - Default timeout for requests sent through the client
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` over a shared blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose client defaults to `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Body reads can time out too
        response
            .bytes()
            .map(|body| body.to_vec())
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Body {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })
    }
}

/// Maps a reqwest error onto the fetch failure taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Transport {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
