//! Content list and note detail.

use axum::{
    Json,
    extract::{Path, State},
};
use notedesk_core::{NoteDetail, NoteId, NoteSummary};
use tracing::{debug, instrument};

use crate::cache::DetailRecord;
use crate::error::AppError;
use crate::handlers::response::CachedResponse;
use crate::state::AppState;

/// GET /api/notes
#[instrument(skip_all)]
pub async fn list_notes(
    State(state): State<AppState>,
) -> Result<Json<CachedResponse<Vec<NoteSummary>>>, AppError> {
    let fetched = state.cache().fetch::<Vec<NoteSummary>>()?;
    Ok(Json(fetched.into()))
}

/// GET /api/notes/{note_id}
///
/// While the detail loads, answers `loading: true` with `data: null`.
#[instrument(skip_all, fields(note_id = %note_id))]
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<Json<CachedResponse<Option<NoteDetail>>>, AppError> {
    let note_id = NoteId::parse(note_id)?;
    let fetched = state.cache().fetch_detail(note_id.as_str())?;

    let detail = match fetched.payload.as_deref() {
        None => None,
        Some(DetailRecord::Found(detail)) => Some(detail.clone()),
        Some(DetailRecord::Missing) => {
            debug!("Note is cached as missing");
            return Err(AppError::NotFound(format!("Note '{note_id}' not found")));
        }
    };

    Ok(Json(CachedResponse::new(&fetched, detail)))
}
