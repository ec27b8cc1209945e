//! SQLite backend using SQLx.
//!
//! [`Database`] owns the connection pool and hands out borrowed
//! repositories per resource, the same way every query module reaches the
//! pool.

mod articles;
mod users;

pub use articles::ArticleRepository;
pub use users::UserRepository;

use super::{Store, StoreError, schema};
use crate::models::{Article, NewArticle, NewUser, User};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents request storms from blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Open a database, creating the file and tables if needed.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = if path == ":memory:" {
            // Each call gets its own named shared-cache database so parallel
            // tests never see each other's rows.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:quillpost-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            // The database only lives while a connection is open, so the
            // single connection is never reaped.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            // WAL lets readers proceed while a like or insert is writing.
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);

            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::create_tables(&pool).await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            pool.close().await;
            return Err(StoreError::Integrity(integrity_result));
        }

        info!("Database integrity check passed");

        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<(), StoreError> {
        for &statement in schema::STATEMENTS {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database tables checked/created");
        Ok(())
    }

    /// Get user repository.
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Get article repository.
    pub fn articles(&self) -> ArticleRepository<'_> {
        ArticleRepository::new(&self.pool)
    }
}

#[async_trait]
impl Store for Database {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.users().create(&user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.users().list().await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.users().find_by_id(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.users().delete(id).await
    }

    async fn create_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        self.articles().create(&article).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        self.articles().list().await
    }

    async fn like_article(&self, id: i64) -> Result<Option<i64>, StoreError> {
        self.articles().like(id).await
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<Article>, StoreError> {
        self.articles().search_by_title(query).await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database disconnected");
    }
}
