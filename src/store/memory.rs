//! In-memory store.
//!
//! Holds both tables behind one lock. Ids come from per-table counters and
//! are never reused, matching the SQLite backend's `AUTOINCREMENT`.

use super::{Store, StoreError};
use crate::models::{ANONYMOUS_AUTHOR, Article, NewArticle, NewUser, User, title_matches};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    articles: Vec<Article>,
    next_user_id: i64,
    next_article_id: i64,
    closed: bool,
}

impl Tables {
    fn open(&self) -> Result<(), StoreError> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

/// Process-local store owning its tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whole seconds, so records look the same as ones read back from SQLite.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.tables.read().open()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write();
        tables.open()?;
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            created_at: now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read();
        tables.open()?;
        Ok(tables.users.clone())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read();
        tables.open()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write();
        tables.open()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() != before)
    }

    async fn create_article(&self, article: NewArticle) -> Result<Article, StoreError> {
        let mut tables = self.tables.write();
        tables.open()?;
        // Users are kept in id order, so the first one is the earliest.
        let author = tables
            .users
            .first()
            .map(|u| u.username.clone())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());
        tables.next_article_id += 1;
        let article = Article {
            id: tables.next_article_id,
            title: article.title,
            content: article.content,
            author,
            likes: 0,
            created_at: now(),
        };
        tables.articles.push(article.clone());
        Ok(article)
    }

    async fn list_articles(&self) -> Result<Vec<Article>, StoreError> {
        let tables = self.tables.read();
        tables.open()?;
        Ok(tables.articles.clone())
    }

    async fn like_article(&self, id: i64) -> Result<Option<i64>, StoreError> {
        let mut tables = self.tables.write();
        tables.open()?;
        Ok(tables.articles.iter_mut().find(|a| a.id == id).map(|a| {
            a.likes += 1;
            a.likes
        }))
    }

    async fn search_articles(&self, query: &str) -> Result<Vec<Article>, StoreError> {
        let tables = self.tables.read();
        tables.open()?;
        Ok(tables
            .articles
            .iter()
            .filter(|a| title_matches(&a.title, query))
            .cloned()
            .collect())
    }

    async fn close(&self) {
        let mut tables = self.tables.write();
        tables.closed = true;
        tables.users.clear();
        tables.articles.clear();
    }
}
