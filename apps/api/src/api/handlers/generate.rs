use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::prompts::DispatchError;

/// Response from the plain generation endpoint
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Response from the chain generation endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainResponse {
    pub response: String,
    pub model: String,
    pub prompt_type: String,
}

/// Unreadable bodies get the same JSON error shape as validation failures
fn read_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Generate text for a prompt type
///
/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let mut body = read_body(body)?;

    // This endpoint does not accept a temperature
    if let Some(fields) = body.as_object_mut() {
        fields.remove("temperature");
    }

    let result = state.engine.handle(&body).await.map_err(|e| match e {
        DispatchError::Validation(e) => ApiError::from(e),
        DispatchError::Upstream(e) => {
            tracing::error!("Generation failed: {}", e);
            ApiError::internal_server_error(format!("Failed to generate response: {}", e))
        }
    })?;

    Ok(Json(GenerateResponse {
        response: result.text,
    }))
}

/// Generate text, echoing the model and prompt type used
///
/// POST /api/generate/chain
pub async fn generate_chain(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChainResponse>, ApiError> {
    let body = read_body(body)?;

    let result = state.engine.handle(&body).await.map_err(|e| match e {
        DispatchError::Validation(e) => ApiError::from(e),
        DispatchError::Upstream(e) => {
            tracing::error!("Chain generation failed: {}", e);
            ApiError::internal_server_error("Failed to generate response")
                .with_details(e.to_string())
        }
    })?;

    Ok(Json(ChainResponse {
        response: result.text,
        model: result.model,
        prompt_type: result.prompt_type,
    }))
}
