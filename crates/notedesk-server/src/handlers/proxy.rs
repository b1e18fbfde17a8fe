//! Image proxy.

use axum::{
    extract::{Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use notedesk_client::UpstreamError;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Browsers may keep proxied images for a day.
const CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// GET /proxy_image?url=
#[instrument(skip_all)]
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing url parameter".to_string()))?;

    let image = state.images().fetch(&url).await.map_err(|e| match e {
        UpstreamError::InvalidUrl(msg) => AppError::BadRequest(msg),
        UpstreamError::Status { status, .. } => {
            warn!(status, "Image upstream refused");
            AppError::BadRequest("Failed to fetch image".to_string())
        }
        other => AppError::Internal(format!("Image proxy failed: {other}")),
    })?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(notedesk_client::media::DEFAULT_IMAGE_TYPE));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
        ],
        image.bytes,
    )
        .into_response())
}
