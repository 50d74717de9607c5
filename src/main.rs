//! tululu-crawler CLI - batch downloader for one category of tululu.org.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tululu_crawler::config::Config;
use tululu_crawler::console::Console;
use tululu_crawler::crawl::{CrawlOptions, Crawler};
use tululu_crawler::fetcher::HttpFetcher;
use tululu_crawler::scrape::{BookOptions, SiteUrls};

/// Console crawler for tululu.org - a free library of electronic books.
#[derive(Parser, Debug)]
#[command(name = "tululu-crawler")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First listing page to parse.
    #[arg(long = "start_page", default_value_t = 1)]
    start_page: u32,

    /// Last listing page to parse, inclusive.
    #[arg(long = "end_page", default_value_t = 1)]
    end_page: u32,

    /// Id of the book category.
    #[arg(long = "category_id", default_value_t = 55)]
    category_id: u32,

    /// Folder in which text files and images are created.
    #[arg(long = "dest_folder", default_value = "data")]
    dest_folder: PathBuf,

    /// If set, book covers are not saved.
    #[arg(long = "skip_imgs")]
    skip_imgs: bool,

    /// If set, txt files are not saved.
    #[arg(long = "skip_txt")]
    skip_txt: bool,

    /// File the parsing result is written to, as a JSON array.
    #[arg(long = "json_path", default_value = "books_info.json")]
    json_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let console = Console::new();

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let fetcher = HttpFetcher::new(&config.http).context("Failed to build HTTP client")?;
    let site = SiteUrls::new(&config.site.base_url).context("Invalid site.base_url")?;

    let opts = CrawlOptions {
        category_id: args.category_id,
        start_page: args.start_page,
        end_page: args.end_page,
        downloads: BookOptions {
            books_dir: args.dest_folder.join("books"),
            images_dir: args.dest_folder.join("images"),
            skip_text: args.skip_txt,
            skip_images: args.skip_imgs,
        },
    };

    let mut crawler = Crawler::new(fetcher, site, &config.backoff);
    let outcome = crawler.run(&opts).await.context("Crawl aborted")?;

    let file = File::create(&args.json_path)
        .with_context(|| format!("Failed to create {}", args.json_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &outcome.books).context("Failed to write book summary")?;
    writer.flush().context("Failed to write book summary")?;

    console.success(&format!("{} books downloaded", outcome.books.len()));
    let errors = &outcome.errors;
    if errors.redirect_errors > 0 {
        console.info(&format!(
            "{} redirect errors while downloading books",
            errors.redirect_errors
        ));
    }
    if errors.http_errors > 0 {
        console.info(&format!(
            "{} http errors while downloading books",
            errors.http_errors
        ));
    }
    if errors.connection_errors > 0 {
        console.info(&format!(
            "{} connection errors while downloading books",
            errors.connection_errors
        ));
    }
    console.info(&format!("Summary written to {}", args.json_path.display()));

    Ok(())
}
