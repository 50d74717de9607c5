//! Error types for the tululu crawler.
//!
//! Uses `thiserror` for structured error definitions. `FetchError` carries
//! the per-request outcome classification; `ScrapeError` is the wider error
//! type for parsing and file persistence.

use thiserror::Error;

/// Classified failure of a single HTTP attempt.
///
/// Exactly one variant applies per attempt. The orchestrator tolerates all
/// three kinds on a per-book basis; everything else aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a 3xx status. Redirect-following is
    /// disabled; on this site a redirect means the page is gone or moved.
    #[error("redirect response (HTTP {status}), page unavailable")]
    Redirect { status: u16 },

    /// The server explicitly rejected the request (4xx or 5xx).
    #[error("HTTP error status {status}")]
    Status { status: u16 },

    /// The request could not be established or completed (DNS failure,
    /// refused connection, timeout, reset mid-body).
    #[error("connection failure: {0}")]
    Connection(String),
}

impl FetchError {
    /// Short kind name used in warning messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Redirect { .. } => "redirect",
            FetchError::Status { .. } => "http",
            FetchError::Connection(_) => "connection",
        }
    }
}

/// Error type for scraping and download operations.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// An HTTP attempt failed; see [`FetchError`] for the classification.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Writing a downloaded file (or creating its directory) failed.
    #[error("file write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The required element isn't present in the page HTML.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// The page structure doesn't match what the site is known to serve.
    #[error("malformed page: {0}")]
    Parse(String),

    /// URL construction or book-id extraction failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse the config file
    #[error("failed to parse config: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(FetchError::Redirect { status: 302 }.kind(), "redirect");
        assert_eq!(FetchError::Status { status: 404 }.kind(), "http");
        assert_eq!(
            FetchError::Connection("timed out".to_string()).kind(),
            "connection"
        );
    }

    #[test]
    fn test_scrape_error_preserves_fetch_classification() {
        let err = ScrapeError::from(FetchError::Status { status: 500 });
        match err {
            ScrapeError::Fetch(FetchError::Status { status }) => assert_eq!(status, 500),
            other => panic!("unexpected error: {other}"),
        }
    }
}
