//! Crawler for the tululu.org free e-book library.
//!
//! This library provides functionality for:
//! - Enumerating the listing pages of one book category
//! - Parsing book detail pages (title, author, genres, reader comments)
//! - Downloading covers and plain-text book files under sanitized paths
//! - Running the whole batch sequentially with per-kind failure tallies
//!   and adaptive backoff on connection failures

pub mod config;
pub mod console;
pub mod crawl;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod scrape;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use console::Console;
pub use crawl::{CrawlOptions, CrawlOutcome, Crawler, ErrorTally};
pub use error::{ConfigError, FetchError, ScrapeError};
pub use fetcher::{FetchedBody, Fetcher, HttpFetcher};
pub use scrape::{BookOptions, BookRecord, SiteUrls};
