//! Category listing pages.
//!
//! A category is paginated; each listing page repeats one table per book
//! inside the main content region, and the first anchor of each table links
//! to the book's detail page.

use super::SiteUrls;
use crate::error::ScrapeError;
use crate::fetcher::Fetcher;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// CSS selectors used for parsing.
struct Selectors {
    /// One table per book entry inside the main content region.
    book_entry: Selector,
    /// Anchors within a book entry; the first one is the detail link.
    link: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    book_entry: Selector::parse("div#content table.d_book").unwrap(),
    link: Selector::parse("a").unwrap(),
});

/// Fetches one listing page and returns the book detail URLs on it.
///
/// Any fetch failure propagates: a listing page that can't be read leaves
/// the whole page range unusable, so it is not tolerated the way per-book
/// failures are. URLs come back in document order, duplicates included.
pub async fn list_book_urls(
    fetcher: &dyn Fetcher,
    site: &SiteUrls,
    category_id: u32,
    page_num: u32,
) -> Result<Vec<String>, ScrapeError> {
    let page_url = site.category_page(category_id, page_num);
    let body = fetcher.fetch(&page_url).await?;
    let doc = Html::parse_document(&body.text());
    extract_book_urls(&doc, &page_url)
}

/// Pulls every book link out of a parsed listing page.
///
/// Links are resolved against the listing page's own URL.
fn extract_book_urls(doc: &Html, page_url: &str) -> Result<Vec<String>, ScrapeError> {
    let base =
        Url::parse(page_url).map_err(|e| ScrapeError::InvalidUrl(format!("'{page_url}': {e}")))?;

    let mut urls = Vec::new();
    for entry in doc.select(&SELECTORS.book_entry) {
        let anchor = entry
            .select(&SELECTORS.link)
            .next()
            .ok_or_else(|| ScrapeError::ElementNotFound("book entry link".to_string()))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ScrapeError::ElementNotFound("book entry href".to_string()))?;
        let url = base
            .join(href)
            .map_err(|e| ScrapeError::InvalidUrl(format!("'{href}': {e}")))?;
        urls.push(url.to_string());
    }

    Ok(urls)
}
