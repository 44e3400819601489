use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    catalog::CatalogTable,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::providers::MusicCatalog,
};

pub mod recommendations;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogTable>,
    pub provider: Arc<dyn MusicCatalog>,
    pub enrichment_concurrency: usize,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
