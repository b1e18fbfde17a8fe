use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self { status: "UP" }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::up())
}
