//! Error types for the crawler.
//!
//! Every fallible operation returns [`AppError`]. The four crawl-specific
//! variants map onto the failure kinds of a run:
//!
//! | Variant | Raised when | Effect on the run |
//! |---------|-------------|-------------------|
//! | [`AppError::Fetch`] | a mandatory GET is not `200` or the transport fails | fatal |
//! | [`AppError::MalformedFeed`] | a listing block lacks its date, link or title | fatal |
//! | [`AppError::MalformedArticle`] | an article page has no body container | degraded to empty text |
//! | [`AppError::DateParse`] | a date heading cannot be understood | fatal |

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Mandatory fetch failed.
    #[error("Could not fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Listing page is missing an expected element.
    #[error("Malformed feed page {url}: {reason}")]
    MalformedFeed { url: String, reason: String },

    /// Article page has neither body marker.
    #[error("Malformed article page {url}: no article body found")]
    MalformedArticle { url: String },

    #[error("Could not parse date {text:?} (locale {locale})")]
    DateParse { text: String, locale: String },

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_feed(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::MalformedFeed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn date_parse(text: impl Into<String>, locale: impl fmt::Display) -> Self {
        Self::DateParse {
            text: text.into(),
            locale: locale.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
