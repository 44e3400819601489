use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        artist = %request.artist,
        "Processing recommendation request"
    );

    let response = recommendations::recommend_tracks(
        &state.catalog,
        state.provider.clone(),
        request,
        state.enrichment_concurrency,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}
