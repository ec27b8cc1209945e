//! Unified error handling for quillpost.
//!
//! Every handler returns [`ApiResult`]. Errors render as a JSON body of the
//! form `{"error": "..."}` with a matching status code, and carry a static
//! code for metric labels.

use crate::models::ValidationError;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The two resource collections, for not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Article,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Article => f.write_str("Article"),
        }
    }
}

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The request could not be parsed (body, path or query).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::User,
            id,
        }
    }

    pub fn article_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: Resource::Article,
            id,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Rejected { .. } => "rejected",
            Self::Store(StoreError::Closed) => "store_closed",
            Self::Store(_) => "store_error",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Store(StoreError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-visible message. Store failures are not echoed back.
    fn public_message(&self) -> String {
        match self {
            Self::Store(StoreError::Closed) => "service is shutting down".to_string(),
            Self::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(ref e) = self {
            tracing::error!(error = %e, "Store operation failed");
        }
        crate::metrics::record_error(self.error_code());

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;
