//! Command-line interface definitions.
//!
//! Every option can also be given through an environment variable. Options
//! left unset fall back to the YAML settings file (`--config`) and then to
//! the built-in defaults, see [`Settings`](crate::config::Settings).

use clap::Parser;

/// Command-line arguments for the feed crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl the default topic with default settings
/// iz_feed_crawler
///
/// # Three pages of another tag into a scratch database
/// iz_feed_crawler -t klyuchevaia-stavka -p 3 -d /tmp/news.db
///
/// # Settings from a file, page count overridden
/// iz_feed_crawler -c crawler.yaml --pages 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "IZ_CONFIG")]
    pub config: Option<String>,

    /// Tag whose feed is crawled
    #[arg(short, long, env = "IZ_TOPIC")]
    pub topic: Option<String>,

    /// Number of listing pages to crawl, starting at page 0
    #[arg(short, long, env = "IZ_PAGES")]
    pub pages: Option<u32>,

    /// Site origin, e.g. https://iz.ru
    #[arg(long, env = "IZ_ORIGIN")]
    pub origin: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "IZ_DATABASE")]
    pub database: Option<String>,

    /// Seconds to wait after each listing page
    #[arg(long, env = "IZ_DELAY_SECS")]
    pub delay_secs: Option<u64>,

    /// Language of the feed's date headings (ru or en)
    #[arg(long, env = "IZ_LOCALE")]
    pub locale: Option<String>,

    /// Append-only log file
    #[arg(long, env = "IZ_LOG_FILE")]
    pub log_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::parse_from(["iz_feed_crawler"]);
        assert!(cli.config.is_none());
        assert!(cli.pages.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "iz_feed_crawler",
            "--topic",
            "infliatciia",
            "--pages",
            "17",
            "--origin",
            "https://iz.ru",
            "--delay-secs",
            "0",
            "--locale",
            "ru",
            "--log-file",
            "parser.log",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("infliatciia"));
        assert_eq!(cli.pages, Some(17));
        assert_eq!(cli.origin.as_deref(), Some("https://iz.ru"));
        assert_eq!(cli.delay_secs, Some(0));
        assert_eq!(cli.locale.as_deref(), Some("ru"));
        assert_eq!(cli.log_file.as_deref(), Some("parser.log"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "iz_feed_crawler",
            "-t",
            "ekonomika",
            "-p",
            "3",
            "-d",
            "/tmp/news.db",
            "-c",
            "crawler.yaml",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("ekonomika"));
        assert_eq!(cli.pages, Some(3));
        assert_eq!(cli.database.as_deref(), Some("/tmp/news.db"));
        assert_eq!(cli.config.as_deref(), Some("crawler.yaml"));
    }

    #[test]
    fn test_cli_rejects_negative_pages() {
        assert!(Cli::try_parse_from(["iz_feed_crawler", "--pages", "-1"]).is_err());
    }
}
