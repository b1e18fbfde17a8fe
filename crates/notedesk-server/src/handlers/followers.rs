//! Follower list.

use axum::{Json, extract::State};
use notedesk_core::FollowerPage;
use tracing::instrument;

use crate::error::AppError;
use crate::handlers::response::CachedResponse;
use crate::state::AppState;

/// GET /api/followers
#[instrument(skip_all)]
pub async fn list_followers(
    State(state): State<AppState>,
) -> Result<Json<CachedResponse<FollowerPage>>, AppError> {
    let fetched = state.cache().fetch::<FollowerPage>()?;
    Ok(Json(fetched.into()))
}
