use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::prompts::TemplateDescriptor;

/// List the available prompt types
///
/// GET /api/prompts
pub async fn list_prompts(State(state): State<AppState>) -> Json<Vec<TemplateDescriptor>> {
    Json(state.engine.catalog().descriptors())
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
