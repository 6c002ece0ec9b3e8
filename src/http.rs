//! HTTP fetching with mandatory / best-effort semantics.
//!
//! A [`Fetcher`] issues plain GET requests. Only a `200 OK` response is parsed
//! into a [`Document`]. Every other outcome is logged, then:
//!
//! - a **mandatory** fetch fails with [`AppError::Fetch`], aborting the run;
//! - a **best-effort** fetch returns [`Document::Empty`], on which every
//!   lookup finds nothing.
//!
//! No retries, no custom timeouts; redirects follow the `reqwest` defaults.

use crate::error::{AppError, Result};
use reqwest::{Client, StatusCode};
use scraper::Html;
use tracing::{debug, error, instrument};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A fetched page.
#[derive(Debug)]
pub enum Document {
    /// Page came back `200 OK` and was parsed.
    Parsed(Html),
    /// Best-effort fetch that failed.
    Empty,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self::Parsed(Html::parse_document(body))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn html(&self) -> Option<&Html> {
        match self {
            Self::Parsed(html) => Some(html),
            Self::Empty => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` and parse the body.
    ///
    /// # Errors
    ///
    /// [`AppError::Fetch`] when `mandatory` is set and the response is not
    /// `200 OK` or the request itself fails. Best-effort fetches never error.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str, mandatory: bool) -> Result<Document> {
        let reason = match self.client.get(url).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => match resp.text().await {
                Ok(body) => {
                    debug!(bytes = body.len(), "Fetched page");
                    return Ok(Document::parse(&body));
                }
                Err(e) => format!("failed reading body: {e}"),
            },
            Ok(resp) => format!("status {}", resp.status().as_u16()),
            Err(e) => e.to_string(),
        };

        error!(%url, %reason, "Could not parse provided url");
        if mandatory {
            error!(%url, "Could not fetch mandatory page");
            return Err(AppError::fetch(url, reason));
        }
        Ok(Document::Empty)
    }
}
