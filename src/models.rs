//! Data models for crawled articles.
//!
//! - [`ArticleStub`]: what a listing page tells us about an article
//! - [`ArticleRecord`]: a stub enriched with body text and a resolved date,
//!   ready to be written to the store

use chrono::NaiveDate;

/// A partial article as found on a listing page, before its page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStub {
    /// Headline with newlines removed and surrounding whitespace trimmed.
    pub title: String,
    /// The day-group heading, exactly as the listing shows it (e.g. `"вчера"`).
    pub raw_date: String,
    /// Absolute article URL: site origin followed by the listing's href.
    pub url: String,
}

/// A fully assembled article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub date: NaiveDate,
    pub url: String,
    /// Concatenated paragraph text; empty when the article page could not be read.
    pub text: String,
}

impl ArticleRecord {
    /// Combine a stub with its resolved date and body text.
    pub fn from_stub(stub: ArticleStub, date: NaiveDate, text: String) -> Self {
        Self {
            title: stub.title,
            date,
            url: stub.url,
            text,
        }
    }

    /// The `date` column value, `YYYY-MM-DD`.
    pub fn date_column(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_stub() {
        let stub = ArticleStub {
            title: "Инфляция замедлилась".to_string(),
            raw_date: "вчера".to_string(),
            url: "https://iz.ru/1234/inflation".to_string(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let record = ArticleRecord::from_stub(stub, date, "A.B.".to_string());

        assert_eq!(record.title, "Инфляция замедлилась");
        assert_eq!(record.url, "https://iz.ru/1234/inflation");
        assert_eq!(record.text, "A.B.");
        assert_eq!(record.date, date);
    }

    #[test]
    fn test_date_column_is_iso() {
        let record = ArticleRecord {
            title: "t".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            url: "https://iz.ru/x".to_string(),
            text: String::new(),
        };
        assert_eq!(record.date_column(), "2024-01-05");
    }
}
