//! Store module for persistent storage.
//!
//! Provides the [`Store`] abstraction the HTTP handlers talk to, with two
//! backends:
//! - [`Database`]: async SQLite access using SQLx
//! - [`MemoryStore`]: process-local tables, for development and tests
//!
//! A store is opened once at startup with [`open`] and closed after the
//! server has drained with [`Store::close`].

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{ArticleRepository, Database, UserRepository};

use crate::config::{Backend, DatabaseConfig};
use crate::models::{Article, NewArticle, NewUser, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("database integrity check failed: {0}")]
    Integrity(String),
    #[error("store is closed")]
    Closed,
}

/// Persistence operations behind the users and articles resources.
///
/// Each method is a single store operation; handlers never compose them
/// into multi-step transactions.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for banners and logs.
    fn backend(&self) -> &'static str;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Returns `true` when a user was removed.
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// Insert an article authored by the earliest user, or
    /// [`ANONYMOUS_AUTHOR`](crate::models::ANONYMOUS_AUTHOR) when there is none.
    async fn create_article(&self, article: NewArticle) -> Result<Article, StoreError>;

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError>;

    /// Atomically add one like. Returns the new count, or `None` when the
    /// article does not exist.
    async fn like_article(&self, id: i64) -> Result<Option<i64>, StoreError>;

    /// Articles whose title contains `query`, ignoring case.
    /// An empty query matches nothing.
    async fn search_articles(&self, query: &str) -> Result<Vec<Article>, StoreError>;

    /// Release the underlying resources. Later calls fail with
    /// [`StoreError::Closed`].
    async fn close(&self);
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StoreError::Closed,
            other => StoreError::Sqlx(other),
        }
    }
}

/// Open the configured backend.
pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        Backend::Sqlite => {
            let db = Database::new(&config.path, config.max_connections).await?;
            Ok(Arc::new(db))
        }
        Backend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
