use axum::{extract::State, http::StatusCode, Json};

use crate::api::state::AppState;
use crate::archive::GuardStatus;

/// Fire the archive trigger in the background
///
/// POST /api/archive/init
///
/// Called by the client on mount; repeated calls are harmless.
pub async fn init_archive(State(state): State<AppState>) -> (StatusCode, Json<GuardStatus>) {
    let guard = state.archive_guard.clone();
    tokio::spawn(async move {
        let outcome = guard.trigger_once().await;
        tracing::debug!(?outcome, "Archive init finished");
    });

    (StatusCode::ACCEPTED, Json(state.archive_guard.status()))
}

/// Current archive guard state
///
/// GET /api/archive/status
pub async fn archive_status(State(state): State<AppState>) -> Json<GuardStatus> {
    Json(state.archive_guard.status())
}
