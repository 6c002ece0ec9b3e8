//! Run settings.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults (`https://iz.ru`, tag `infliatciia`, 17 pages, ...)
//! 2. the YAML file named by `--config`
//! 3. command-line flags and their environment variables
//!
//! ```yaml
//! origin: https://iz.ru
//! topic: infliatciia
//! pages: 17
//! database: data/izvestia_inflation.db
//! delay_secs: 2
//! locale: ru
//! log_file: parser.log
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;
use tracing::instrument;
use url::Url;

use crate::cli::Cli;
use crate::dates::Locale;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub origin: String,
    pub topic: String,
    pub pages: u32,
    pub database: PathBuf,
    pub delay_secs: u64,
    pub locale: String,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: "https://iz.ru".to_string(),
            topic: "infliatciia".to_string(),
            pages: 17,
            database: PathBuf::from("data/izvestia_inflation.db"),
            delay_secs: 2,
            locale: "ru".to_string(),
            log_file: PathBuf::from("parser.log"),
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the `--config` file if any, overlaid with
    /// explicit flags. The result is validated.
    #[instrument(level = "debug", skip_all)]
    pub async fn resolve(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        let settings = base.with_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).await.map_err(|e| {
            AppError::config(format!("cannot read settings file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(origin) = &cli.origin {
            self.origin = origin.clone();
        }
        if let Some(topic) = &cli.topic {
            self.topic = topic.clone();
        }
        if let Some(pages) = cli.pages {
            self.pages = pages;
        }
        if let Some(database) = &cli.database {
            self.database = PathBuf::from(database);
        }
        if let Some(delay) = cli.delay_secs {
            self.delay_secs = delay;
        }
        if let Some(locale) = &cli.locale {
            self.locale = locale.clone();
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = PathBuf::from(log_file);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pages == 0 {
            return Err(AppError::config("pages must be at least 1"));
        }
        if self.topic.trim().is_empty() {
            return Err(AppError::config("topic must not be empty"));
        }
        let origin = Url::parse(&self.origin)?;
        if !matches!(origin.scheme(), "http" | "https") || origin.host_str().is_none() {
            return Err(AppError::config(format!(
                "origin must be an absolute http(s) URL, got {:?}",
                self.origin
            )));
        }
        self.locale()?;
        Ok(())
    }

    pub fn locale(&self) -> Result<Locale> {
        self.locale.parse()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("iz_feed_crawler").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_match_original_run() {
        let s = Settings::default();
        assert_eq!(s.origin, "https://iz.ru");
        assert_eq!(s.topic, "infliatciia");
        assert_eq!(s.pages, 17);
        assert_eq!(s.database, PathBuf::from("data/izvestia_inflation.db"));
        assert_eq!(s.delay(), Duration::from_secs(2));
        assert_eq!(s.locale().unwrap(), Locale::Russian);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let s = Settings::from_yaml_str("topic: ekonomika\npages: 3\n").unwrap();
        assert_eq!(s.topic, "ekonomika");
        assert_eq!(s.pages, 3);
        assert_eq!(s.origin, "https://iz.ru");
        assert_eq!(s.delay_secs, 2);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Settings::from_yaml_str("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_yaml_key_is_rejected() {
        assert!(matches!(
            Settings::from_yaml_str("pagez: 3"),
            Err(AppError::Yaml(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let file = Settings::from_yaml_str("topic: ekonomika\npages: 3\ndelay_secs: 5").unwrap();
        let s = file.with_overrides(&cli(&["--pages", "1", "--locale", "en"]));
        assert_eq!(s.topic, "ekonomika");
        assert_eq!(s.pages, 1);
        assert_eq!(s.delay_secs, 5);
        assert_eq!(s.locale().unwrap(), Locale::English);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_pages = Settings {
            pages: 0,
            ..Settings::default()
        };
        let relative_origin = Settings {
            origin: "iz.ru".to_string(),
            ..Settings::default()
        };
        let ftp_origin = Settings {
            origin: "ftp://iz.ru".to_string(),
            ..Settings::default()
        };
        let bad_locale = Settings {
            locale: "fr".to_string(),
            ..Settings::default()
        };
        let blank_topic = Settings {
            topic: " ".to_string(),
            ..Settings::default()
        };

        assert!(matches!(zero_pages.validate(), Err(AppError::Config(_))));
        assert!(matches!(relative_origin.validate(), Err(AppError::Url(_))));
        assert!(matches!(ftp_origin.validate(), Err(AppError::Config(_))));
        assert!(matches!(bad_locale.validate(), Err(AppError::Config(_))));
        assert!(matches!(blank_topic.validate(), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_resolve_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawler.yaml");
        std::fs::write(&path, "origin: http://localhost:8080\npages: 2\n").unwrap();

        let s = Settings::resolve(&cli(&["-c", path.to_str().unwrap(), "-t", "x"]))
            .await
            .unwrap();

        assert_eq!(s.origin, "http://localhost:8080");
        assert_eq!(s.pages, 2);
        assert_eq!(s.topic, "x");
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_config_error() {
        let err = Settings::resolve(&cli(&["-c", "/nonexistent/crawler.yaml"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
