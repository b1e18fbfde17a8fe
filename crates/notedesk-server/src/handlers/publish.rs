//! Image note publishing.

use std::path::{Path, PathBuf};

use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
};
use notedesk_core::{PublishRequest, PublishedNote};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::cache::refresher::with_timeout;
use crate::error::AppError;
use crate::state::AppState;

/// Publishing uploads several images; allow more than a plain API call.
const PUBLISH_TIMEOUT_FACTOR: u32 = 6;

/// Form fields of `POST /api/notes`.
#[derive(Debug, Default)]
struct PublishForm {
    title: String,
    desc: String,
    is_private: bool,
    images: Vec<PathBuf>,
}

/// POST /api/notes
#[instrument(skip_all)]
pub async fn publish_note(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PublishedNote>, AppError> {
    let active = state
        .session()
        .authenticated()
        .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))?;

    let form = read_form(multipart, state.upload_dir()).await?;
    let request = PublishRequest::new(form.title, form.desc, form.images).private(form.is_private);
    request.validate()?;

    let limit = state.cache().store().config().upstream_timeout * PUBLISH_TIMEOUT_FACTOR;
    let published = with_timeout(limit, active.source().publish_image_note(&request))
        .await
        .map_err(|e| {
            warn!(error = %e, "Publish failed");
            AppError::from(e)
        })?;

    info!(note_id = %published.note_id, images = request.image_paths.len(), "Note published");
    Ok(Json(published))
}

async fn read_form(mut multipart: Multipart, upload_dir: &Path) -> Result<PublishForm, AppError> {
    let mut form = PublishForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = field_text(field).await?,
            "desc" => form.desc = field_text(field).await?,
            "is_private" => form.is_private = parse_flag(&field_text(field).await?),
            "images" => {
                if let Some(path) = save_image(field, upload_dir).await? {
                    form.images.push(path);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {e}")))
}

/// Checkbox values browsers and scripts send.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

/// Writes one uploaded image. Empty file inputs are skipped.
async fn save_image(field: Field<'_>, upload_dir: &Path) -> Result<Option<PathBuf>, AppError> {
    let Some(original) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?;
    if original.is_empty() && bytes.is_empty() {
        return Ok(None);
    }

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;

    let path = upload_dir.join(format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(&original)
    ));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save upload: {e}")))?;

    Ok(Some(path))
}

/// Reduces a client file name to a safe basename.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}
