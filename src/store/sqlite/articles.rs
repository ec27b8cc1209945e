//! Article repository for database queries.

use crate::models::{ANONYMOUS_AUTHOR, Article, NewArticle, timestamp_from_secs, title_matches};
use crate::store::StoreError;
use sqlx::SqlitePool;

type ArticleRow = (i64, String, String, String, i64, i64);

fn article_from_row((id, title, content, author, likes, created_at): ArticleRow) -> Article {
    Article {
        id,
        title,
        content,
        author,
        likes,
        created_at: timestamp_from_secs(created_at),
    }
}

/// Repository for article operations.
pub struct ArticleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new article repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an article with zero likes.
    ///
    /// The author is the username of the lowest-id user at insert time,
    /// falling back to [`ANONYMOUS_AUTHOR`].
    pub async fn create(&self, article: &NewArticle) -> Result<Article, StoreError> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            INSERT INTO articles (title, content, author, likes, created_at)
            VALUES (
                ?,
                ?,
                COALESCE((SELECT username FROM users ORDER BY id LIMIT 1), ?),
                0,
                ?
            )
            RETURNING id, title, content, author, likes, created_at
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(ANONYMOUS_AUTHOR)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(article_from_row(row))
    }

    /// Load all articles.
    pub async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, content, author, likes, created_at
            FROM articles
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(article_from_row).collect())
    }

    /// Add one like in a single statement, so concurrent likes never
    /// overwrite each other.
    pub async fn like(&self, id: i64) -> Result<Option<i64>, StoreError> {
        let likes = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE articles
            SET likes = likes + 1
            WHERE id = ?
            RETURNING likes
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(likes)
    }

    /// Articles whose title contains `query`, ignoring case.
    ///
    /// SQLite `LIKE` and `lower()` only fold ASCII, so titles are matched
    /// in Rust with the same rule the memory store uses.
    pub async fn search_by_title(&self, query: &str) -> Result<Vec<Article>, StoreError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT id, title, content, author, likes, created_at
            FROM articles
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|row| title_matches(&row.1, query))
            .map(article_from_row)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{ANONYMOUS_AUTHOR, NewArticle, NewUser};
    use crate::store::Database;

    fn new_article(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            content: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_article_defaults() {
        let db = Database::new(":memory:", 1).await.unwrap();
        let article = db.articles().create(&new_article("Hello")).await.unwrap();
        assert_eq!(article.likes, 0);
        assert_eq!(article.author, ANONYMOUS_AUTHOR);
    }

    #[tokio::test]
    async fn test_author_is_earliest_user() {
        let db = Database::new(":memory:", 1).await.unwrap();
        for name in ["alice", "bob"] {
            db.users()
                .create(&NewUser {
                    username: name.into(),
                    email: format!("{name}@example.com"),
                })
                .await
                .unwrap();
        }

        let article = db.articles().create(&new_article("Hello")).await.unwrap();
        assert_eq!(article.author, "alice");
    }

    #[tokio::test]
    async fn test_like_counts_up() {
        let db = Database::new(":memory:", 1).await.unwrap();
        let article = db.articles().create(&new_article("Hello")).await.unwrap();

        for expected in 1..=3 {
            assert_eq!(db.articles().like(article.id).await.unwrap(), Some(expected));
        }
        assert_eq!(db.articles().like(article.id + 100).await.unwrap(), None);

        let stored = db.articles().list().await.unwrap();
        assert_eq!(stored[0].likes, 3);
    }

    #[tokio::test]
    async fn test_search_by_title() {
        let db = Database::new(":memory:", 1).await.unwrap();
        let titles = [
            "Hello World",
            "hello world",
            "Goodbye",
            "100% done",
            "Привет мир",
            "Café Olé",
        ];
        for title in titles {
            db.articles().create(&new_article(title)).await.unwrap();
        }

        let hits = db.articles().search_by_title("Hello").await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = db.articles().search_by_title("%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% done");

        let hits = db.articles().search_by_title("_").await.unwrap();
        assert!(hits.is_empty());

        let hits = db.articles().search_by_title("привет").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Привет мир");

        let hits = db.articles().search_by_title("CAFÉ").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Café Olé");

        assert!(db.articles().search_by_title("").await.unwrap().is_empty());
        assert!(db.articles().search_by_title("missing").await.unwrap().is_empty());
    }
}
