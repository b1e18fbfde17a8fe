//! Session endpoints.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::auth;
use crate::error::AppError;
use crate::handlers::response::SessionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub cookie: String,
}

/// GET /api/session
pub async fn current_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let response = match state.session().authenticated() {
        Some(active) => SessionResponse {
            authenticated: true,
            user_id: active.user_id().map(str::to_string),
            nickname: active.nickname().map(str::to_string),
        },
        None => SessionResponse::anonymous(),
    };
    Json(response)
}

/// POST /login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let outcome = auth::login(&state, &request.cookie).await?;

    Ok(Json(SessionResponse {
        authenticated: true,
        user_id: outcome.user_id,
        nickname: outcome.nickname,
    }))
}

/// POST /logout
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Json<SessionResponse> {
    auth::logout(&state).await;
    Json(SessionResponse::anonymous())
}
