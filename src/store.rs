//! SQLite persistence for crawled articles.
//!
//! Everything lands in one flat table:
//!
//! ```sql
//! CREATE TABLE News (id INTEGER PRIMARY KEY, date TEXT, title TEXT, url TEXT, content TEXT)
//! ```
//!
//! There is no uniqueness constraint. Crawling the same page twice stores its
//! articles twice.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::utils::ensure_parent_dir;

const CREATE_NEWS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS News (
        id INTEGER PRIMARY KEY,
        date TEXT,
        title TEXT,
        url TEXT,
        content TEXT
    )
"#;

const INSERT_ARTICLE: &str = "INSERT INTO News (date, title, url, content) VALUES (?, ?, ?, ?)";

/// Destination for the records of one crawled page.
pub trait ArticleSink {
    /// Persist a page's records atomically.
    async fn append(&self, records: &[ArticleRecord]) -> Result<()>;
}

/// Single-writer handle on the articles database.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl ArticleStore {
    /// Open (creating if needed) the database file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!("Opened article store");
        Ok(Self { pool, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `News` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_NEWS_TABLE).execute(&self.pool).await?;
        debug!("Schema ready");
        Ok(())
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM News")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

impl ArticleSink for ArticleStore {
    #[instrument(level = "debug", skip_all, fields(count = records.len()))]
    async fn append(&self, records: &[ArticleRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(INSERT_ARTICLE)
                .bind(record.date_column())
                .bind(&record.title)
                .bind(&record.url)
                .bind(&record.text)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!("Committed records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(title: &str, url: &str, text: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            url: url.to_string(),
            text: text.to_string(),
        }
    }

    async fn open_temp() -> (tempfile::TempDir, ArticleStore) {
        let dir = tempdir().unwrap();
        let store = ArticleStore::open(dir.path().join("data/news.db")).await.unwrap();
        store.ensure_schema().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_file_and_parent_dir() {
        let (dir, store) = open_temp().await;
        assert!(dir.path().join("data/news.db").is_file());
        assert_eq!(store.path(), dir.path().join("data/news.db"));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let (_dir, store) = open_temp().await;
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_schema_columns() {
        let (_dir, store) = open_temp().await;
        let columns: Vec<(String, String)> =
            sqlx::query_as("SELECT name, type FROM pragma_table_info('News') ORDER BY cid")
                .fetch_all(&store.pool)
                .await
                .unwrap();

        let expected = [
            ("id", "INTEGER"),
            ("date", "TEXT"),
            ("title", "TEXT"),
            ("url", "TEXT"),
            ("content", "TEXT"),
        ];
        assert_eq!(columns.len(), expected.len());
        for ((name, ty), (want_name, want_ty)) in columns.iter().zip(expected) {
            assert_eq!(name, want_name);
            assert_eq!(ty, want_ty);
        }
    }

    #[tokio::test]
    async fn test_append_writes_each_field_to_its_column() {
        let (_dir, store) = open_temp().await;
        store
            .append(&[record("Заголовок", "https://iz.ru/1", "A.B.C.")])
            .await
            .unwrap();

        let row: (i64, String, String, String, String) =
            sqlx::query_as("SELECT id, date, title, url, content FROM News")
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(row.0, 1);
        assert_eq!(row.1, "2024-03-14");
        assert_eq!(row.2, "Заголовок");
        assert_eq!(row.3, "https://iz.ru/1");
        assert_eq!(row.4, "A.B.C.");
    }

    #[tokio::test]
    async fn test_append_keeps_duplicates() {
        let (_dir, store) = open_temp().await;
        let batch = [record("a", "https://iz.ru/1", ""), record("b", "https://iz.ru/2", "x")];

        store.append(&batch).await.unwrap();
        store.append(&batch).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_append_empty_batch() {
        let (_dir, store) = open_temp().await;
        store.append(&[]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("news.db");
        {
            let store = ArticleStore::open(&path).await.unwrap();
            store.ensure_schema().await.unwrap();
            store.append(&[record("a", "https://iz.ru/1", "")]).await.unwrap();
            store.pool.close().await;
        }
        let store = ArticleStore::open(&path).await.unwrap();
        store.ensure_schema().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
