//! Response bodies, one struct per endpoint.

use crate::models::{Article, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `GET /`
#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: String,
    pub name: String,
    pub version: &'static str,
}

/// `GET /health`
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub backend: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Plain confirmation, e.g. `DELETE /users/{id}`.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// `POST /users`
#[derive(Debug, Serialize)]
pub struct UserCreated {
    pub message: String,
    pub id: i64,
    pub user: User,
}

/// `GET /users`
#[derive(Debug, Serialize)]
pub struct UserList {
    pub count: usize,
    pub users: Vec<User>,
}

/// `POST /articles`
#[derive(Debug, Serialize)]
pub struct ArticleCreated {
    pub message: String,
    pub id: i64,
    pub article: Article,
}

/// `GET /articles`
#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub count: usize,
    pub articles: Vec<Article>,
}

/// `POST /articles/{id}/like`
#[derive(Debug, Serialize)]
pub struct Liked {
    pub message: String,
    pub likes: i64,
}

/// `GET /articles/search`
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub results: Vec<Article>,
}
