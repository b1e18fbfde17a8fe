use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notedesk_client::UpstreamError;
use notedesk_core::DeskError;
use serde::Serialize;
use tracing::error;

use crate::cache::CacheError;

#[derive(Debug)]
pub enum AppError {
    /// No authenticated session, or the platform rejected it.
    Unauthorized(String),

    /// Invalid parameters
    BadRequest(String),

    NotFound(String),

    /// The platform failed or answered with an error.
    Upstream(String),

    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = status.canonical_reason().unwrap_or("Error").to_string();
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Upstream(msg) => msg,
            AppError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                msg
            }
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::NotAuthenticated => AppError::Unauthorized(err.to_string()),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotAuthenticated | UpstreamError::SessionExpired => {
                AppError::Unauthorized(err.to_string())
            }
            UpstreamError::InvalidUrl(_) | UpstreamError::Unsupported(_) => {
                AppError::BadRequest(err.to_string())
            }
            UpstreamError::Io(_) | UpstreamError::InvalidConfig(_) => {
                AppError::Internal(err.to_string())
            }
            _ => AppError::Upstream(err.to_string()),
        }
    }
}

impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        if err.is_client_error() {
            AppError::BadRequest(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}
