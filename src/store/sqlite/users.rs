//! User repository for database queries.

use crate::models::{NewUser, User, timestamp_from_secs};
use crate::store::StoreError;
use sqlx::SqlitePool;

type UserRow = (i64, String, String, i64);

fn user_from_row((id, username, email, created_at): UserRow) -> User {
    User {
        id,
        username,
        email,
        created_at: timestamp_from_secs(created_at),
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. Duplicate usernames and emails are allowed.
    pub async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let now = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(user_from_row(row))
    }

    /// Load all users.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(user_from_row).collect())
    }

    /// Find user by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    /// Delete user by id. Returns `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
