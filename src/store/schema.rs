//! Table definitions, applied idempotently when a database is opened.

/// `users(id, username, email, created_at)`.
pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
)
"#;

/// `articles(id, title, content, author, likes, created_at)`.
pub const CREATE_ARTICLES: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL DEFAULT 'Anonymous',
    likes INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
    created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
)
"#;

/// All statements in application order.
pub const STATEMENTS: &[&str] = &[CREATE_USERS, CREATE_ARTICLES];
