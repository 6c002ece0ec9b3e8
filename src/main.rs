//! # Izvestia feed crawler
//!
//! Walks the paginated tag feed of [iz.ru](https://iz.ru), follows every
//! listed article, and stores title, date, URL and body text in SQLite.
//!
//! ## Usage
//!
//! ```sh
//! iz_feed_crawler --topic infliatciia --pages 17 --database data/izvestia_inflation.db
//! ```
//!
//! ## Architecture
//!
//! The run is strictly sequential:
//! 1. **Listing**: fetch `/tag/{topic}?page={n}` and parse one stub per day block
//! 2. **Articles**: fetch each article page and concatenate its paragraphs
//! 3. **Dates**: resolve headings like `"вчера"` or `"12 марта"` to calendar dates
//! 4. **Storage**: commit the page's records in one transaction, then wait
//!
//! A listing page that cannot be fetched or parsed stops the run with a
//! non-zero exit status. Pages committed before the failure stay in the
//! database.

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod crawler;
mod dates;
mod error;
mod http;
mod models;
mod scrapers;
mod store;
mod utils;

use cli::Cli;
use config::Settings;
use crawler::{CrawlLoop, FeedCrawler};
use dates::NaturalDateParser;
use http::Fetcher;
use scrapers::izvestia::IzvestiaFeed;
use store::ArticleStore;

/// Log to stdout and append to `log_file`, filtered by `RUST_LOG` (default `info`).
fn init_tracing(log_file: &Path) -> std::io::Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = tfmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());
    let file_layer = tfmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let settings = Settings::resolve(&args).await?;

    init_tracing(&settings.log_file)?;
    info!("iz_feed_crawler starting up");
    debug!(?args, "Parsed CLI arguments");
    info!(
        origin = %settings.origin,
        topic = %settings.topic,
        pages = settings.pages,
        database = %settings.database.display(),
        delay_secs = settings.delay_secs,
        locale = %settings.locale,
        "Resolved settings"
    );

    let store = ArticleStore::open(&settings.database).await?;
    store.ensure_schema().await?;

    let crawler = FeedCrawler::new(
        Fetcher::new()?,
        IzvestiaFeed::new(settings.origin.clone(), settings.topic.clone()),
        NaturalDateParser::local(),
        settings.locale()?,
    );
    let crawl = CrawlLoop::new(crawler, store).with_delay(settings.delay());

    let summary = match crawl.run(settings.pages).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Crawl failed; pages committed so far are kept");
            return Err(e.into());
        }
    };

    let stored = crawl.sink().count().await?;
    info!(
        pages = summary.pages,
        articles = summary.articles,
        stored,
        database = %crawl.sink().path().display(),
        elapsed = ?summary.elapsed,
        secs = summary.elapsed.as_secs(),
        "Execution complete"
    );

    Ok(())
}
