//! Resource records and validated creation inputs.
//!
//! Records are what the store hands back; `New*` inputs are what clients
//! send. Inputs are deserialized leniently and then checked by
//! [`NewUser::validate`] / [`NewArticle::validate`] before any store call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author recorded on articles created while no user exists.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A stored article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// Rejected creation input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    /// Check required fields, returning the input with surrounding
    /// whitespace removed.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            username: required("username", self.username)?,
            email: required("email", self.email)?,
        })
    }
}

/// Body of `POST /articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
}

impl NewArticle {
    /// Check required fields. Content keeps its inner formatting; only the
    /// outer whitespace is dropped.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", self.title)?,
            content: required("content", self.content)?,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Convert stored Unix seconds into a UTC timestamp.
///
/// Out-of-range values collapse to the epoch rather than failing a read.
pub fn timestamp_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Case-insensitive substring match used by article search. Case is folded
/// with Unicode lowercase mapping, so "ПРИВЕТ" finds "Привет мир".
///
/// An empty needle matches nothing.
pub fn title_matches(title: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    title.to_lowercase().contains(&needle.to_lowercase())
}
