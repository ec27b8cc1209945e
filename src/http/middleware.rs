//! Per-request tracing span, request id and metrics.

use crate::telemetry::{self, REQUEST_ID_HEADER, RequestTimer, spans};
use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, debug};

/// Label used for requests that matched no route, keeping label
/// cardinality bounded.
const UNMATCHED_ROUTE: &str = "unmatched";

pub async fn track_request(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let request_id = telemetry::new_request_id();
    let span = spans::request(&request_id, &method, request.uri().path());
    let mut timer = RequestTimer::new(method, route);

    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    timer.finish(status);
    span.in_scope(|| debug!(status, elapsed_ms = timer.elapsed_ms(), "Request completed"));

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
