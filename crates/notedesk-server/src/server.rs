use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    cache::clear_cache,
    followers::list_followers,
    health::health_check,
    metrics::metrics_handler,
    notes::{get_note, list_notes},
    proxy::proxy_image,
    publish::publish_note,
    session::{current_session, login, logout},
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Builds the console router.
///
/// `body_limit` caps every request body, uploads included.
pub fn create_router_with_state(
    state: AppState,
    prometheus_handle: PrometheusHandle,
    body_limit: usize,
) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Separate state: the scrape handle.
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let app_router = Router::new()
        .route("/health", get(health_check))
        // Session
        .route("/api/session", get(current_session))
        .route("/login", post(login))
        .route("/logout", post(logout))
        // Cache-backed reads
        .route("/api/notes", get(list_notes).post(publish_note))
        .route("/api/notes/{note_id}", get(get_note))
        .route("/api/followers", get(list_followers))
        .route("/proxy_image", get(proxy_image))
        .route("/cache", delete(clear_cache))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Binds `addr` and serves until Ctrl+C or SIGTERM.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
    body_limit: usize,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle, body_limit);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
