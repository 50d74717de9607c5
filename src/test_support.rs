//! Test doubles shared across unit tests.

use crate::error::FetchError;
use crate::fetcher::{FetchedBody, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned [`Fetcher`] serving predefined outcomes and recording every
/// request in order.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<FetchedBody, FetchError>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a 200 text response for `url`.
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(FetchedBody {
                status: 200,
                bytes: body.as_bytes().to_vec(),
            }),
        );
        self
    }

    /// Serves a 200 binary response for `url`.
    pub fn with_bytes(mut self, url: &str, bytes: &[u8]) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(FetchedBody {
                status: 200,
                bytes: bytes.to_vec(),
            }),
        );
        self
    }

    /// Serves a classified failure for `url`.
    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    /// URLs fetched so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .unwrap_or_else(|| panic!("unexpected fetch: {url}"))
            .clone()
    }
}
