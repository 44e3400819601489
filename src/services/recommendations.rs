use std::sync::Arc;
use std::time::Instant;

use crate::{
    catalog::CatalogTable,
    error::AppResult,
    models::{RecommendationRequest, RecommendationResponse, RecommendedTrack, SeedTrack},
    services::{enrichment, features, lookup, merge, providers::MusicCatalog, ranking},
};

/// Runs the full recommendation pipeline for one request.
///
/// Stages run strictly in order, each producing a new value:
/// lookup → merge → feature-build → rank → enrich.
pub async fn recommend_tracks(
    catalog: &CatalogTable,
    provider: Arc<dyn MusicCatalog>,
    request: RecommendationRequest,
    enrichment_concurrency: usize,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();

    let user_track =
        lookup::lookup_user_track(provider.as_ref(), &request.title, &request.artist).await?;

    tracing::info!(
        track_id = %user_track.id,
        name = %user_track.name,
        artist = %user_track.artist,
        provider = provider.name(),
        "User track resolved"
    );

    let merged = merge::merge_user_track(user_track.clone(), catalog)?;

    let matrix = features::build_feature_matrix(&merged);

    tracing::info!(
        rows = matrix.rows.len(),
        width = matrix.schema.width(),
        genre_terms = matrix.schema.genre_terms.len(),
        decades = matrix.schema.decades.len(),
        "Feature matrix built"
    );

    let ranked = ranking::rank_by_similarity(&matrix, &user_track.id)?;

    let track_ids: Vec<String> = ranked.iter().map(|s| s.id.clone()).collect();
    let metadata =
        enrichment::enrich_recommendations(provider, &track_ids, enrichment_concurrency).await?;

    let recommendations: Vec<RecommendedTrack> = metadata
        .into_iter()
        .map(|meta| RecommendedTrack {
            name: meta.name,
            artist: meta.artist,
            link: meta.link,
            artwork_url: meta.artwork_url,
        })
        .collect();

    tracing::info!(
        recommendations = recommendations.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation pipeline completed"
    );

    Ok(RecommendationResponse {
        seed: SeedTrack {
            name: user_track.name,
            artist: user_track.artist,
        },
        recommendations,
    })
}
