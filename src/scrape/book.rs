//! Book detail pages.
//!
//! A detail page carries the book's metadata plus links to its cover image
//! and plain-text download. Parsing is all-or-nothing: any failure while
//! fetching the page or downloading its files discards the whole book.

use super::{BookRecord, SiteUrls, extract_book_id};
use crate::download::download_file;
use crate::error::ScrapeError;
use crate::fetcher::Fetcher;
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Where downloaded files land and which downloads to skip.
#[derive(Debug, Clone)]
pub struct BookOptions {
    /// Folder for plain-text book files.
    pub books_dir: PathBuf,
    /// Folder for cover images.
    pub images_dir: PathBuf,
    /// Leave `text_path` empty instead of downloading the text.
    pub skip_text: bool,
    /// Leave `cover_path` empty instead of downloading the cover.
    pub skip_images: bool,
}

/// CSS selectors used for parsing.
struct Selectors {
    /// The page's single heading, `Title :: Author`.
    heading: Selector,
    /// Cover image element.
    cover: Selector,
    /// One block per reader comment.
    comment: Selector,
    /// The comment text within a comment block.
    comment_text: Selector,
    /// Genre links.
    genre: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    heading: Selector::parse("h1").unwrap(),
    cover: Selector::parse("div.bookimage img").unwrap(),
    comment: Selector::parse("div.texts").unwrap(),
    comment_text: Selector::parse("span").unwrap(),
    genre: Selector::parse("span.d_book a").unwrap(),
});

/// Metadata pulled out of the page before any download happens.
#[derive(Debug, PartialEq, Eq)]
struct PageData {
    title: String,
    author: String,
    cover_src: String,
    comments: Vec<String>,
    genres: Vec<String>,
}

/// Parses a book's detail page and optionally downloads its files.
///
/// Fetch and download failures propagate unchanged so the caller can
/// classify them; no partially filled record is ever returned. With both
/// skip flags set, no download is attempted and the path fields stay empty.
pub async fn parse_book(
    fetcher: &dyn Fetcher,
    site: &SiteUrls,
    book_url: &str,
    opts: &BookOptions,
) -> Result<BookRecord, ScrapeError> {
    let book_id = extract_book_id(book_url)?;

    let body = fetcher.fetch(book_url).await?;
    let page = {
        let doc = Html::parse_document(&body.text());
        extract_page(&doc)?
    };

    let cover_url = site.resolve(&page.cover_src)?;
    let cover_filename = filename_from_url(&cover_url);

    let cover_path = if opts.skip_images {
        String::new()
    } else {
        download_file(fetcher, &cover_url, &cover_filename, &opts.images_dir)
            .await?
            .display()
            .to_string()
    };

    let text_path = if opts.skip_text {
        String::new()
    } else {
        let text_url = site.text_download(book_id);
        let text_filename = format!("{}. {}.txt", book_id, page.title);
        download_file(fetcher, &text_url, &text_filename, &opts.books_dir)
            .await?
            .display()
            .to_string()
    };

    Ok(BookRecord {
        title: page.title,
        author: page.author,
        cover_path,
        text_path,
        comments: page.comments,
        genres: page.genres,
    })
}

/// Extracts all metadata from a parsed detail page.
fn extract_page(doc: &Html) -> Result<PageData, ScrapeError> {
    let heading = doc
        .select(&SELECTORS.heading)
        .next()
        .ok_or_else(|| ScrapeError::ElementNotFound("page heading".to_string()))?;
    let heading_text = heading.text().collect::<String>();
    let (title, author) = heading_text
        .split_once("::")
        .ok_or_else(|| ScrapeError::Parse("heading has no 'Title :: Author' separator".to_string()))?;

    let cover_src = doc
        .select(&SELECTORS.cover)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| ScrapeError::ElementNotFound("cover image".to_string()))?
        .to_string();

    let comments = doc
        .select(&SELECTORS.comment)
        .map(|block| {
            block
                .select(&SELECTORS.comment_text)
                .next()
                .map(|span| span.text().collect::<String>())
                .ok_or_else(|| ScrapeError::ElementNotFound("comment text".to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let genres = doc
        .select(&SELECTORS.genre)
        .map(|link| link.text().collect::<String>())
        .collect();

    Ok(PageData {
        title: title.trim().to_string(),
        author: author.trim().to_string(),
        cover_src,
        comments,
        genres,
    })
}

/// Default filename for a downloaded URL: its trailing path segment.
fn filename_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .to_string()
}
