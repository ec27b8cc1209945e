//! Telemetry utilities for request timing and correlation.

use std::time::Instant;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Guard for timing a request and recording metrics.
///
/// Records latency when dropped, so a request that panics or is cancelled
/// mid-flight is still counted (with status 500 unless [`finish`] ran).
///
/// [`finish`]: RequestTimer::finish
pub struct RequestTimer {
    method: String,
    route: String,
    status: u16,
    start: Instant,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn new(method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            route: route.into(),
            status: 500,
            start: Instant::now(),
        }
    }

    /// Set the final status code.
    pub fn finish(&mut self, status: u16) {
        self.status = status;
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_request(&self.method, &self.route, self.status, duration);
    }
}

/// Generate a fresh request id.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one HTTP request.
    pub fn request(id: &str, method: &str, path: &str) -> Span {
        info_span!("request", id = %id, method = %method, path = %path)
    }
}
