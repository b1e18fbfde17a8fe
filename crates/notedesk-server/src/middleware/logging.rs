//! Structured request logging.
//!
//! Every request runs inside an `http_request` span. Probe and scrape
//! endpoints are logged at debug level so they do not drown console traffic.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use super::request_id::REQUEST_ID_HEADER;

/// Paths polled by health checks and Prometheus.
pub const QUIET_PATHS: &[&str] = &["/health", "/metrics"];

/// Returns true if requests to `path` are logged at debug level.
pub fn is_quiet_path(path: &str) -> bool {
    QUIET_PATHS.contains(&path)
}

/// How a finished request is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Picks the level a completed request is logged at.
///
/// Server errors always warn, even on quiet paths.
pub fn completion_level(status: StatusCode, quiet: bool) -> LogLevel {
    if status.is_server_error() {
        LogLevel::Warn
    } else if quiet {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Layer that logs each request inside an `http_request` span.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let quiet = is_quiet_path(request.uri().path());

        // Set by RequestIdLayer, which runs first.
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                debug!("Request started");

                let response = inner.call(request).await?;

                let status = response.status();
                let duration_ms = start.elapsed().as_millis() as u64;

                match completion_level(status, quiet) {
                    LogLevel::Warn => {
                        warn!(status = status.as_u16(), duration_ms, "Request failed")
                    }
                    LogLevel::Info if status == StatusCode::UNAUTHORIZED => {
                        info!(status = status.as_u16(), duration_ms, "Request needs a login")
                    }
                    LogLevel::Info => {
                        info!(status = status.as_u16(), duration_ms, "Request completed")
                    }
                    LogLevel::Debug => {
                        debug!(status = status.as_u16(), duration_ms, "Request completed")
                    }
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
