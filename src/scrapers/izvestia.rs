//! Izvestia (`iz.ru`) tag feed scraper.
//!
//! # Page Structure
//!
//! A tag listing (`/tag/{topic}?page={n}`) contains one `div.lenta_news__day`
//! block per day. Each block has an `<h3>` with the day heading, links to
//! articles, and `div.lenta_news__day__list__item__title` headlines. The
//! first link and the first headline of a block make up its article stub.
//!
//! Article pages keep their text in `div[itemprop="articleBody"]`; older
//! layouts use `div.text-article__inside` instead.

use crate::error::{AppError, Result};
use crate::http::Document;
use crate::models::ArticleStub;
use crate::utils::strip_newlines;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

static DAY_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("div.lenta_news__day").unwrap());
static DATE_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.lenta_news__day__list__item__title").unwrap());
static ARTICLE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[itemprop="articleBody"]"#).unwrap());
static ARTICLE_BODY_FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.text-article__inside").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// One tag feed on one site.
#[derive(Debug, Clone)]
pub struct IzvestiaFeed {
    origin: String,
    topic: String,
}

impl IzvestiaFeed {
    /// `origin` is scheme and host, e.g. `https://iz.ru`. A trailing slash is dropped.
    pub fn new(origin: impl Into<String>, topic: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            origin,
            topic: topic.into(),
        }
    }

    /// Listing URL for a 0-based page index.
    pub fn feed_url(&self, page: u32) -> String {
        format!(
            "{}/tag/{}?page={}",
            self.origin,
            urlencoding::encode(&self.topic),
            page
        )
    }

    /// Extract one stub per day block, in document order.
    ///
    /// # Errors
    ///
    /// [`AppError::MalformedFeed`] if any block lacks its date heading, a link
    /// with an `href`, or a headline. The whole page fails; no block is skipped.
    #[instrument(level = "debug", skip(self, document))]
    pub fn parse_feed(&self, document: &Document, page_url: &str) -> Result<Vec<ArticleStub>> {
        let Some(html) = document.html() else {
            return Ok(Vec::new());
        };

        html.select(&DAY_BLOCK)
            .enumerate()
            .map(|(i, block)| self.parse_block(block, i, page_url))
            .collect()
    }

    fn parse_block(&self, block: ElementRef<'_>, index: usize, page_url: &str) -> Result<ArticleStub> {
        let missing = |what: &str| AppError::malformed_feed(page_url, format!("day block #{index} has no {what}"));

        let raw_date = first_text(block, &DATE_HEADING).ok_or_else(|| missing("<h3> date heading"))?;
        let href = block
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or_else(|| missing("article link"))?;
        let title = first_text(block, &TITLE).ok_or_else(|| missing("title element"))?;

        let stub = ArticleStub {
            title: strip_newlines(&title),
            raw_date,
            url: format!("{}{}", self.origin, href),
        };
        debug!(index, url = %stub.url, "Parsed day block");
        Ok(stub)
    }
}

/// Concatenate the paragraphs of an article body.
///
/// Each paragraph loses its newlines and surrounding whitespace; paragraphs are
/// joined with no separator. An [`Document::Empty`] page yields an empty string.
///
/// # Errors
///
/// [`AppError::MalformedArticle`] when a parsed page has neither body container.
pub fn extract_text(document: &Document, url: &str) -> Result<String> {
    let Some(html) = document.html() else {
        return Ok(String::new());
    };
    let body = find_body(html).ok_or_else(|| AppError::MalformedArticle {
        url: url.to_string(),
    })?;

    Ok(body
        .select(&PARAGRAPH)
        .map(|p| strip_newlines(&p.text().collect::<String>()))
        .collect())
}

fn find_body(html: &Html) -> Option<ElementRef<'_>> {
    html.select(&ARTICLE_BODY)
        .next()
        .or_else(|| html.select(&ARTICLE_BODY_FALLBACK).next())
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>())
}
