//! Site-specific page parsing.
//!
//! Shared types for the two page kinds the crawler understands: category
//! listing pages ([`catalog`]) and book detail pages ([`book`]).

pub mod book;
pub mod catalog;

pub use book::{BookOptions, parse_book};
pub use catalog::list_book_urls;

use crate::error::ScrapeError;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

/// One parsed book, in the shape the JSON summary is written in.
///
/// `cover_path` and `text_path` are empty when the corresponding download
/// was skipped. Field names are renamed on serialization to match the
/// summary format (`image_src`, `book_path`).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    #[serde(rename = "image_src")]
    pub cover_path: String,
    #[serde(rename = "book_path")]
    pub text_path: String,
    pub comments: Vec<String>,
    pub genres: Vec<String>,
}

/// The numeric book id sits in the last path component before the trailing
/// slash, behind a short letter prefix: `.../b239/` yields 239.
static BOOK_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[a-z]*(\d+)/?$").unwrap());

/// Extracts the numeric book id from a detail-page URL.
pub fn extract_book_id(book_url: &str) -> Result<u64, ScrapeError> {
    BOOK_ID_REGEX
        .captures(book_url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ScrapeError::InvalidUrl(format!("no book id in '{book_url}'")))
}

/// URL builder rooted at the site base.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        let base = Url::parse(base_url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("'{base_url}': {e}")))?;
        Ok(Self { base })
    }

    /// Listing page for one category page: `<base>/l<category>/<page>`.
    pub fn category_page(&self, category_id: u32, page_num: u32) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{base}/l{category_id}/{page_num}")
    }

    /// Plain-text download endpoint for a book id.
    pub fn text_download(&self, book_id: u64) -> String {
        let base = self.base.as_str().trim_end_matches('/');
        format!("{base}/txt.php?id={book_id}")
    }

    /// Resolves an `href`/`src` value against the site root.
    ///
    /// The site emits root-relative image paths, so resolution is anchored
    /// at the root rather than at the page the value came from.
    pub fn resolve(&self, href: &str) -> Result<String, ScrapeError> {
        self.base
            .join(href)
            .map(|url| url.to_string())
            .map_err(|e| ScrapeError::InvalidUrl(format!("'{href}': {e}")))
    }
}
