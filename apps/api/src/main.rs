use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pdca_assistant_api::api::{self, AppState};
use pdca_assistant_api::archive::{ArchiveGuard, HttpArchiveTrigger};
use pdca_assistant_api::config::AppConfig;
use pdca_assistant_api::llm::OpenAiAdapter;
use pdca_assistant_api::prompts::{DispatchEngine, TemplateCatalog};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();

    // Build the template catalog once; it is read-only from here on
    let catalog = Arc::new(TemplateCatalog::standard());
    tracing::info!("Loaded {} prompt templates", catalog.len());

    let adapter = OpenAiAdapter::new(&config.llm).expect("Failed to build model adapter");
    let engine = DispatchEngine::new(catalog, Arc::new(adapter), config.generation.clone());

    let trigger =
        HttpArchiveTrigger::new(&config.archive).expect("Failed to build archive trigger client");
    let archive_guard = ArchiveGuard::new(Arc::new(trigger));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = api::router(AppState::new(engine, archive_guard)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
