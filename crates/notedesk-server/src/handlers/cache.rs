//! Cache clearing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{info, instrument};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    /// Singleton slots that held a payload.
    pub cleared_slots: usize,
    /// Detail records dropped, fresh or stale.
    pub cleared_details: usize,
    pub message: String,
}

/// DELETE /cache
#[instrument(skip_all)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearResponse> {
    let report = state.cache().clear_all();

    info!(
        slots = report.slots,
        details = report.details,
        "Cache cleared"
    );

    Json(ClearResponse {
        cleared_slots: report.slots,
        cleared_details: report.details,
        message: format!(
            "Cleared {} slots and {} note details",
            report.slots, report.details
        ),
    })
}
