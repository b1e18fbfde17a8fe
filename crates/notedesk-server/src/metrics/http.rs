//! HTTP metrics middleware.
//!
//! Requests are labelled by route template and status class, so
//! `/api/notes/{note_id}` is one series no matter how many notes are viewed.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};

const REQUESTS_TOTAL: &str = "notedesk_http_requests_total";
const REQUEST_DURATION: &str = "notedesk_http_request_duration_seconds";
const REQUESTS_IN_FLIGHT: &str = "notedesk_http_requests_in_flight";

/// Route label of requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route that is never counted.
const SCRAPE_ROUTE: &str = "/metrics";

/// Returns the status class label (`"2xx"`, `"4xx"`, ...).
pub fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        _ => "5xx",
    }
}

/// Keeps the in-flight gauge raised for the lifetime of a request.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!(REQUESTS_IN_FLIGHT).increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!(REQUESTS_IN_FLIGHT).decrement(1.0);
    }
}

/// Records request count, latency and concurrency per route.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = match &matched_path {
        Some(path) if path.as_str() == SCRAPE_ROUTE => return next.run(request).await,
        Some(path) => path.as_str().to_owned(),
        None => UNMATCHED_ROUTE.to_owned(),
    };
    let method = request.method().as_str().to_owned();

    let in_flight = InFlight::enter();
    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();
    drop(in_flight);

    let class = status_class(response.status());

    counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "class" => class
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION,
        "method" => method,
        "route" => route,
        "class" => class
    )
    .record(elapsed.as_secs_f64());

    response
}

/// Describes the HTTP metrics.
pub fn register_http_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "HTTP requests by route and status class");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request duration"
    );
    metrics::describe_gauge!(REQUESTS_IN_FLIGHT, "HTTP requests being served");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::NOT_MODIFIED), "3xx");
        assert_eq!(status_class(StatusCode::UNAUTHORIZED), "4xx");
        assert_eq!(status_class(StatusCode::BAD_GATEWAY), "5xx");
        assert_eq!(status_class(StatusCode::SWITCHING_PROTOCOLS), "1xx");
    }
}
