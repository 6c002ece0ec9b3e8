//! Natural-language date normalization.
//!
//! Listing pages group articles under headings such as `"Сегодня"`,
//! `"вчера"` or `"12 марта"`. [`DateNormalizer`] turns such a heading into a
//! calendar date. The crawler only depends on the trait, so the parser below
//! can be replaced without touching the crawl code.
//!
//! # Recognized forms
//!
//! | Form | Russian | English |
//! |------|---------|---------|
//! | relative | `сегодня`, `вчера`, `позавчера` | `today`, `yesterday` |
//! | day + month | `12 марта`, `1 январь` | `12 march`, `12 mar`, `march 12` |
//! | day + month + year | `12 марта 2024`, `12 марта 2024 г.` | `12 march 2024`, `march 12, 2024` |
//! | numeric | `12.03.2024`, `2024-03-12` | same |
//!
//! A trailing clock time (`", 10:15"`) is ignored. A missing year means the
//! year of the reference date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{AppError, Result};

static TRAILING_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]*(?:в\s+|at\s+)?\d{1,2}:\d{2}(?::\d{2})?$").unwrap());
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\s+(\p{L}+)\.?(?:\s+(\d{4}))?(?:\s*(?:г\.?|года?))?$").unwrap()
});
static MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{L}+)\.?\s+(\d{1,2})(?:,?\s+(\d{4}))?$").unwrap());
static DOTTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").unwrap());
static ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap());

/// Language a date heading is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Russian,
    English,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Russian => "ru",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Locale::Russian),
            "en" => Ok(Locale::English),
            other => Err(AppError::config(format!(
                "unsupported locale {other:?} (expected \"ru\" or \"en\")"
            ))),
        }
    }
}

/// Turns free-text date fragments into calendar dates.
pub trait DateNormalizer {
    /// # Errors
    ///
    /// [`AppError::DateParse`] when `raw` is not a recognized date expression.
    fn normalize(&self, raw: &str, locale: Locale) -> Result<NaiveDate>;
}

/// Rule-based parser for the date headings found on news listings.
///
/// Relative words are resolved against `today`, which is fixed at
/// construction time.
#[derive(Debug, Clone, Copy)]
pub struct NaturalDateParser {
    today: NaiveDate,
}

impl NaturalDateParser {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Parser anchored at the current local date.
    pub fn local() -> Self {
        Self::new(Local::now().date_naive())
    }

    fn days_ago(&self, n: u64) -> Option<NaiveDate> {
        self.today.checked_sub_days(Days::new(n))
    }

    fn relative(&self, text: &str, locale: Locale) -> Option<NaiveDate> {
        let offset = match (locale, text) {
            (Locale::Russian, "сегодня") | (Locale::English, "today") => 0,
            (Locale::Russian, "вчера") | (Locale::English, "yesterday") => 1,
            (Locale::Russian, "позавчера") => 2,
            _ => return None,
        };
        self.days_ago(offset)
    }

    fn absolute(&self, text: &str, locale: Locale) -> Option<NaiveDate> {
        if let Some(caps) = DAY_MONTH.captures(text) {
            let month = month_number(&caps[2], locale)?;
            return self.ymd(caps.get(3).map(|m| m.as_str()), month, &caps[1]);
        }
        if locale == Locale::English {
            if let Some(caps) = MONTH_DAY.captures(text) {
                let month = month_number(&caps[1], locale)?;
                return self.ymd(caps.get(3).map(|m| m.as_str()), month, &caps[2]);
            }
        }
        if let Some(caps) = DOTTED.captures(text) {
            let month = caps[2].parse().ok()?;
            return self.ymd(Some(&caps[3]), month, &caps[1]);
        }
        if let Some(caps) = ISO.captures(text) {
            let month = caps[2].parse().ok()?;
            return self.ymd(Some(&caps[1]), month, &caps[3]);
        }
        None
    }

    fn ymd(&self, year: Option<&str>, month: u32, day: &str) -> Option<NaiveDate> {
        let year = match year {
            Some(y) => y.parse().ok()?,
            None => self.today.year(),
        };
        NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
    }
}

impl DateNormalizer for NaturalDateParser {
    fn normalize(&self, raw: &str, locale: Locale) -> Result<NaiveDate> {
        let lowered = raw.trim().to_lowercase();
        let without_time = TRAILING_TIME.replace(&lowered, "");
        let text = without_time.trim().trim_end_matches(',').trim();

        let date = self
            .relative(text, locale)
            .or_else(|| self.absolute(text, locale))
            .ok_or_else(|| AppError::date_parse(raw.trim(), locale))?;

        debug!(raw = %raw.trim(), %date, %locale, "Normalized date");
        Ok(date)
    }
}

fn month_number(word: &str, locale: Locale) -> Option<u32> {
    const RU_GENITIVE: [&str; 12] = [
        "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
        "октября", "ноября", "декабря",
    ];
    const RU_NOMINATIVE: [&str; 12] = [
        "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август", "сентябрь",
        "октябрь", "ноябрь", "декабрь",
    ];
    const EN: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];

    let position = match locale {
        Locale::Russian => RU_GENITIVE
            .iter()
            .position(|m| *m == word)
            .or_else(|| RU_NOMINATIVE.iter().position(|m| *m == word)),
        Locale::English => EN
            .iter()
            .position(|m| *m == word)
            .or_else(|| EN.iter().position(|m| word.len() == 3 && m.starts_with(word))),
    };
    position.map(|i| i as u32 + 1)
}
