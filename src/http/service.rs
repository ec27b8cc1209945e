//! Service-level endpoints: banner, health and the unmatched-route fallback.

use super::AppState;
use super::responses::{Banner, Health};
use crate::error::ErrorBody;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

pub async fn banner(State(state): State<AppState>) -> Json<Banner> {
    Json(Banner {
        message: format!("{} API is running", state.name),
        name: state.name.to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Reports 503 when the store does not answer a ping.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    let (status, label) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let body = Health {
        status: label,
        backend: state.store.backend(),
        timestamp: chrono::Utc::now(),
    };
    (status, Json(body))
}

pub async fn no_route() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "route not found".to_string(),
        }),
    )
}
