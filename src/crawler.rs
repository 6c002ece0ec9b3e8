//! Page crawling and the pagination loop.
//!
//! [`FeedCrawler`] turns one listing page into complete [`ArticleRecord`]s:
//!
//! 1. Fetch `{origin}/tag/{topic}?page={n}` (mandatory)
//! 2. Parse one stub per day block
//! 3. For each stub, resolve the date heading and fetch the article text
//!    (best effort)
//!
//! [`CrawlLoop`] runs the crawler over pages `0..N` and hands each page to an
//! [`ArticleSink`], sleeping a fixed delay after every page, the last one
//! included. Pages already committed stay committed when a later page fails.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::dates::{DateNormalizer, Locale};
use crate::error::Result;
use crate::http::Fetcher;
use crate::models::ArticleRecord;
use crate::scrapers::izvestia::{IzvestiaFeed, extract_text};
use crate::store::ArticleSink;
use crate::utils::truncate_for_log;

/// Delay between listing pages.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

pub struct FeedCrawler<D> {
    fetcher: Fetcher,
    feed: IzvestiaFeed,
    dates: D,
    locale: Locale,
}

impl<D: DateNormalizer> FeedCrawler<D> {
    pub fn new(fetcher: Fetcher, feed: IzvestiaFeed, dates: D, locale: Locale) -> Self {
        Self {
            fetcher,
            feed,
            dates,
            locale,
        }
    }

    /// Crawl one listing page, preserving the listing's order.
    ///
    /// # Errors
    ///
    /// - [`AppError::Fetch`](crate::error::AppError::Fetch) if the listing page cannot be fetched
    /// - [`AppError::MalformedFeed`](crate::error::AppError::MalformedFeed) if a day block is incomplete
    /// - [`AppError::DateParse`](crate::error::AppError::DateParse) if a date heading is not understood
    ///
    /// Article pages never fail the crawl; they degrade to empty text.
    #[instrument(level = "info", skip(self))]
    pub async fn crawl_page(&self, page: u32) -> Result<Vec<ArticleRecord>> {
        let url = self.feed.feed_url(page);
        let stubs = {
            let document = self.fetcher.fetch(&url, true).await?;
            self.feed.parse_feed(&document, &url)?
        };
        info!(%url, count = stubs.len(), "Feed parsed");

        let mut records = Vec::with_capacity(stubs.len());
        for stub in stubs {
            let date = self.dates.normalize(&stub.raw_date, self.locale)?;
            let text = self.article_text(&stub.url).await;
            records.push(ArticleRecord::from_stub(stub, date, text));
        }
        Ok(records)
    }

    async fn article_text(&self, url: &str) -> String {
        let document = match self.fetcher.fetch(url, false).await {
            Ok(document) => document,
            Err(e) => {
                warn!(%url, error = %e, "Article fetch failed; storing empty text");
                return String::new();
            }
        };
        if document.is_empty() {
            warn!(%url, "Article page unavailable; storing empty text");
        }

        match extract_text(&document, url) {
            Ok(text) => {
                debug!(%url, preview = %truncate_for_log(&text, 80), "Extracted article text");
                text
            }
            Err(e) => {
                warn!(%url, error = %e, "Article layout not recognized; storing empty text");
                String::new()
            }
        }
    }
}

/// Outcome of a completed [`CrawlLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages: u32,
    pub articles: usize,
    pub elapsed: Duration,
}

pub struct CrawlLoop<D, S> {
    crawler: FeedCrawler<D>,
    sink: S,
    delay: Duration,
}

impl<D: DateNormalizer, S: ArticleSink> CrawlLoop<D, S> {
    pub fn new(crawler: FeedCrawler<D>, sink: S) -> Self {
        Self {
            crawler,
            sink,
            delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Crawl and commit pages `0..total_pages`, one transaction per page.
    ///
    /// The first fatal error stops the loop and is returned as is.
    #[instrument(level = "info", skip(self), fields(delay = ?self.delay))]
    pub async fn run(&self, total_pages: u32) -> Result<CrawlSummary> {
        let started = Instant::now();
        let mut articles = 0;

        for page in 0..total_pages {
            let committed = self.crawl_and_commit(page).await.inspect_err(|e| {
                error!(page, error = %e, "Crawl aborted");
            })?;
            articles += committed;
            info!(page, count = committed, "Page committed successfully");
            sleep(self.delay).await;
        }

        Ok(CrawlSummary {
            pages: total_pages,
            articles,
            elapsed: started.elapsed(),
        })
    }

    async fn crawl_and_commit(&self, page: u32) -> Result<usize> {
        let records = self.crawler.crawl_page(page).await?;
        self.sink.append(&records).await?;
        Ok(records.len())
    }
}
