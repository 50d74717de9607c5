//! HTTP fetching with manual redirect handling.
//!
//! A single shared `reqwest` client issues every request the crawler makes.
//! Redirect-following is disabled: a 3xx from this site means the requested
//! book or category no longer lives at that address, and callers need to
//! observe that directly instead of landing on whatever the redirect points
//! at. Retry and backoff are the orchestrator's job, not this layer's.

use crate::config::HttpConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::{Client, redirect};
use std::time::Duration;

/// Body and final status of a successfully fetched response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    /// HTTP status code (2xx).
    pub status: u16,

    /// Raw response body.
    pub bytes: Vec<u8>,
}

impl FetchedBody {
    /// Returns the body decoded as text (lossy UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// One HTTP GET with a classified outcome.
///
/// The trait is the seam between the crawl pipeline and the network; tests
/// substitute a canned implementation.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and classifies the result.
    ///
    /// Classification order: transport failure maps to
    /// [`FetchError::Connection`]; status >= 400 to [`FetchError::Status`];
    /// status 3xx to [`FetchError::Redirect`]; anything else is a success
    /// carrying the body bytes.
    async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError>;
}

/// Production [`Fetcher`] backed by a configured `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from `config`.
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

/// Builds the HTTP client used for all crawling.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_sec))
        .connect_timeout(Duration::from_secs(config.connect_timeout_sec))
        // 3xx responses must surface to the caller, not be followed.
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(!config.verify_tls)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a status code to its failure classification, if any.
///
/// Client/server errors are checked before the redirect range, so a 4xx can
/// never be misreported as a redirect.
fn classify_status(status: u16) -> Result<(), FetchError> {
    if status >= 400 {
        return Err(FetchError::Status { status });
    }
    if (300..400).contains(&status) {
        return Err(FetchError::Redirect { status });
    }
    Ok(())
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        classify_status(status)?;

        // A failure while reading the body is still a transport failure.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(FetchedBody {
            status,
            bytes: bytes.to_vec(),
        })
    }
}
