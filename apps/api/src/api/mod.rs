// API layer module (adapters for controllers)
// Handlers translate HTTP requests into dispatch engine and guard calls

pub mod errors;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

pub use state::AppState;

/// Build the application routes
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::prompts::health_check))
        // Generation routes
        .route("/api/prompts", get(handlers::prompts::list_prompts))
        .route("/api/generate", post(handlers::generate::generate))
        .route("/api/generate/chain", post(handlers::generate::generate_chain))
        // Archive routes
        .route("/api/archive/init", post(handlers::archive::init_archive))
        .route("/api/archive/status", get(handlers::archive::archive_status))
        // Shared state
        .with_state(state)
}
