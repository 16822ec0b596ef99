//! Prometheus metrics: per-route HTTP counters plus a few credential
//! lifecycle counters incremented from the service layer.
use axum::{
    extract::{MatchedPath, Request},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, TextEncoder};

/// Handler that serialises Prometheus metrics in text format.
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => ([(header::CONTENT_TYPE, encoder.format_type())], buffer).into_response(),
        Err(err) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
        )
            .into_response(),
    }
}

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("http_requests_total", "Total HTTP requests by route"),
        &["method", "path", "status"],
    )
    .expect("http_requests_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("register http_requests_total");
    counter
});

/// Request-counting middleware. Labels use the matched route pattern, not the
/// raw URI, to keep label cardinality bounded.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();

    response
}

fn lifecycle_counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("create counter");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("register counter");
    counter
}

static REGISTER_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    lifecycle_counter("register_requests_total", "Total registration attempts")
});

static LOGIN_REQUESTS_TOTAL: Lazy<IntCounter> =
    Lazy::new(|| lifecycle_counter("login_requests_total", "Total login attempts"));

static LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    lifecycle_counter(
        "login_failures_total",
        "Failed login attempts (unknown user, inactive account, or wrong password)",
    )
});

static TOKEN_REFRESH_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    lifecycle_counter("token_refresh_total", "Successful refresh-token rotations")
});

static SESSIONS_REVOKED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    lifecycle_counter(
        "sessions_revoked_total",
        "Refresh sessions revoked (logout, revocation, reset, sweep)",
    )
});

#[inline]
pub fn inc_register_requests() {
    REGISTER_REQUESTS_TOTAL.inc();
}

#[inline]
pub fn inc_login_requests() {
    LOGIN_REQUESTS_TOTAL.inc();
}

#[inline]
pub fn inc_login_failures() {
    LOGIN_FAILURES_TOTAL.inc();
}

#[inline]
pub fn inc_token_refresh() {
    TOKEN_REFRESH_TOTAL.inc();
}

#[inline]
pub fn inc_sessions_revoked(count: u64) {
    SESSIONS_REVOKED_TOTAL.inc_by(count);
}
