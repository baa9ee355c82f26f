mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use std::sync::Arc;

use handlers::rest;
use repository::Repository;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use service::NoteService;

pub fn app(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(rest::router(service))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded notes server config");

    // Store and service creation
    let repo_ptr = Arc::new(tokio::sync::Mutex::new(Repository::seeded()));
    let service = Arc::new(NoteService::new(repo_ptr));

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.bind_addr());
            panic!("failed to bind to address: {e}");
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notes API running on http://{}", addr),
        Err(e) => tracing::warn!("Listening, but local address is unavailable: {e}"),
    }

    if let Err(e) = axum::serve(listener, app(service)).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}

async fn root() -> Response {
    (
        StatusCode::OK,
        "Welcome to the Notes API. Use /notes to manage notes",
    )
        .into_response()
}
