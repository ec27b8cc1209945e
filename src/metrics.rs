//! Prometheus metrics collection for quillpost.
//!
//! Metrics are exposed on a separate HTTP listener when
//! `server.metrics_port` is set:
//!
//! - `http_requests_total{method,route,status}` - Requests served
//! - `http_request_duration_seconds{method,route}` - Request latency histogram
//! - `http_errors_total{code}` - Error responses by error code
//! - `users_created_total`, `articles_created_total`, `article_likes_total`
//!
//! Until [`init`] runs every recorder is a no-op.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Users created through the API.
pub static USERS_CREATED: OnceLock<IntCounter> = OnceLock::new();

/// Articles created through the API.
pub static ARTICLES_CREATED: OnceLock<IntCounter> = OnceLock::new();

/// Likes applied to existing articles.
pub static ARTICLE_LIKES: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// HTTP metrics
// ========================================================================

/// Requests served by method, matched route and status.
pub static REQUEST_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Request latency by method and matched route.
pub static REQUEST_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Error responses by error code.
pub static REQUEST_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Called once at startup when the metrics endpoint is enabled.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(USERS_CREATED, IntCounter::new("users_created_total", "Users created"));
    register!(ARTICLES_CREATED, IntCounter::new("articles_created_total", "Articles created"));
    register!(ARTICLE_LIKES, IntCounter::new("article_likes_total", "Likes applied to articles"));

    register!(REQUEST_COUNTER, IntCounterVec::new(Opts::new("http_requests_total", "HTTP requests served"), &["method", "route", "status"]));
    register!(REQUEST_LATENCY, HistogramVec::new(
        HistogramOpts::new("http_request_duration_seconds", "HTTP request latency by route")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["method", "route"]));
    register!(REQUEST_ERRORS, IntCounterVec::new(Opts::new("http_errors_total", "HTTP error responses by code"), &["code"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recorders
// ============================================================================

/// Record a completed request with latency.
#[inline]
pub fn record_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    if let Some(c) = REQUEST_COUNTER.get() {
        let status = status.to_string();
        c.with_label_values(&[method, route, status.as_str()]).inc();
    }
    if let Some(h) = REQUEST_LATENCY.get() {
        h.with_label_values(&[method, route]).observe(duration_secs);
    }
}

/// Record an error response.
#[inline]
pub fn record_error(code: &str) {
    if let Some(c) = REQUEST_ERRORS.get() {
        c.with_label_values(&[code]).inc();
    }
}

#[inline]
pub fn record_user_created() {
    if let Some(c) = USERS_CREATED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_article_created() {
    if let Some(c) = ARTICLES_CREATED.get() {
        c.inc();
    }
}

#[inline]
pub fn record_like() {
    if let Some(c) = ARTICLE_LIKES.get() {
        c.inc();
    }
}
