//! HTTP surface: the JSON API router and the Prometheus metrics listener.
//!
//! Both run on axum. The API router carries [`AppState`] so handlers reach
//! the store through dependency injection rather than globals.

mod articles;
mod middleware;
pub mod responses;
mod service;
mod users;

use crate::store::Store;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Service name shown in the banner.
    pub name: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, name: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service::banner))
        .route("/health", get(service::health))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route(
            "/articles",
            post(articles::create_article).get(articles::list_articles),
        )
        .route("/articles/search", get(articles::search_articles))
        .route("/articles/:id/like", post(articles::like_article))
        .fallback(service::no_route)
        .layer(axum::middleware::from_fn(middleware::track_request))
        .with_state(state)
}

/// Serve the API until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "API server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Run the HTTP server for Prometheus metrics.
///
/// Binds to `0.0.0.0:port` and serves the `/metrics` endpoint.
/// This is a long-running task that should be spawned in the background.
pub async fn run_metrics_server(port: u16) {
    let app = Router::new().route("/metrics", get(metrics_handler));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Prometheus HTTP server listening on {}", addr);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind metrics server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Metrics server error: {}", e);
    }
}
