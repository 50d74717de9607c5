//! Batch orchestration of a category crawl.
//!
//! Collects the book URLs for an inclusive page range, then walks them
//! strictly in order. Per-book fetch failures are tallied and skipped;
//! connection failures additionally trigger a growing pause. Anything
//! outside that taxonomy aborts the run.

use crate::config::BackoffConfig;
use crate::console::Console;
use crate::error::{FetchError, ScrapeError};
use crate::fetcher::Fetcher;
use crate::scrape::book::{BookOptions, parse_book};
use crate::scrape::catalog::list_book_urls;
use crate::scrape::{BookRecord, SiteUrls};
use std::time::Duration;

/// Per-kind failure counters for one run. Never decremented.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorTally {
    pub redirect_errors: u32,
    pub http_errors: u32,
    pub connection_errors: u32,
}

impl ErrorTally {
    /// Counts one classified failure.
    fn record(&mut self, error: &FetchError) {
        match error {
            FetchError::Redirect { .. } => self.redirect_errors += 1,
            FetchError::Status { .. } => self.http_errors += 1,
            FetchError::Connection(_) => self.connection_errors += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.redirect_errors + self.http_errors + self.connection_errors
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Growing delay applied after connection failures.
///
/// The delay starts at the configured base, grows by one step per
/// connection failure and is capped at the configured maximum. It never
/// shrinks within a run.
#[derive(Debug)]
struct Backoff {
    current_sec: u64,
    step_sec: u64,
    max_sec: u64,
}

impl Backoff {
    fn new(config: &BackoffConfig) -> Self {
        Self {
            current_sec: config.initial_delay_sec,
            step_sec: config.step_sec,
            max_sec: config.max_delay_sec,
        }
    }

    /// Sleeps out the current delay, then raises it for the next failure.
    async fn apply(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.current_sec)).await;
        self.escalate();
    }

    fn escalate(&mut self) {
        self.current_sec = (self.current_sec + self.step_sec).min(self.max_sec);
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Successfully parsed books, in listing order.
    pub books: Vec<BookRecord>,
    /// Per-kind failure counts.
    pub errors: ErrorTally,
}

/// Options for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub category_id: u32,
    /// First listing page, 1-based.
    pub start_page: u32,
    /// Last listing page, inclusive. Clamped up to `start_page` when
    /// smaller, so at least one page is always processed.
    pub end_page: u32,
    pub downloads: BookOptions,
}

/// Sequential crawler for one category.
pub struct Crawler<F: Fetcher> {
    fetcher: F,
    site: SiteUrls,
    console: Console,
    backoff: Backoff,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, site: SiteUrls, backoff: &BackoffConfig) -> Self {
        Self {
            fetcher,
            site,
            console: Console::new(),
            backoff: Backoff::new(backoff),
        }
    }

    /// Runs the crawl: collects the book URLs across the page range, then
    /// parses every book in order.
    ///
    /// A failed listing page aborts the run; without the URL list there is
    /// nothing to continue with. Per-book failures only reach the tally.
    pub async fn run(&mut self, opts: &CrawlOptions) -> Result<CrawlOutcome, ScrapeError> {
        let end_page = opts.end_page.max(opts.start_page);

        let mut urls = Vec::new();
        for page_num in opts.start_page..=end_page {
            let page_urls =
                list_book_urls(&self.fetcher, &self.site, opts.category_id, page_num).await?;
            urls.extend(page_urls);
        }
        self.console.info(&format!(
            "{} books found in category {}",
            urls.len(),
            opts.category_id
        ));

        let mut books = Vec::new();
        let mut errors = ErrorTally::default();
        let total = urls.len();

        for (index, url) in urls.iter().enumerate() {
            self.console.progress_update(&format!(
                "{} {}",
                self.console.counter(index + 1, total),
                self.console.muted(url),
            ));

            match parse_book(&self.fetcher, &self.site, url, &opts.downloads).await {
                Ok(book) => books.push(book),
                Err(ScrapeError::Fetch(error)) => {
                    self.console.clear_line();
                    self.console.warning(&format!(
                        "{} error when trying to download the book \"{}\"",
                        error.kind(),
                        url
                    ));
                    errors.record(&error);
                    if matches!(error, FetchError::Connection(_)) {
                        self.backoff.apply().await;
                    }
                }
                Err(fatal) => {
                    self.console.clear_line();
                    return Err(fatal);
                }
            }
        }
        self.console.clear_line();

        Ok(CrawlOutcome { books, errors })
    }
}
