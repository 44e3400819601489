use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    error::{AppError, AppResult},
    models::TrackMetadata,
    services::providers::MusicCatalog,
};

/// Fetches display metadata for the ranked track identifiers in parallel.
///
/// Lookups run as independent tasks gated by a semaphore of width
/// `concurrency`; results are reassembled in input order by awaiting the
/// task handles in spawn order. Any single fetch failure fails the whole
/// request: no partial results are returned.
pub async fn enrich_recommendations(
    provider: Arc<dyn MusicCatalog>,
    track_ids: &[String],
    concurrency: usize,
) -> AppResult<Vec<TrackMetadata>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(track_ids.len());

    for track_id in track_ids {
        let provider = provider.clone();
        let semaphore = semaphore.clone();
        let track_id = track_id.clone();

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            provider.fetch_track_metadata(&track_id).await
        }));
    }

    let mut metadata = Vec::with_capacity(tasks.len());

    for task in tasks {
        match task.await {
            Ok(Ok(meta)) => metadata.push(meta),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Metadata fetch failed");
                return Err(AppError::Enrichment(e.to_string()));
            }
            Err(e) => {
                tracing::error!(error = %e, "Metadata fetch task join error");
                return Err(AppError::Internal(e.to_string()));
            }
        }
    }

    tracing::debug!(tracks = metadata.len(), "Recommendations enriched");

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookedUpTrack;
    use tokio_test::assert_ok;

    mockall::mock! {
        Catalog {}

        #[async_trait::async_trait]
        impl MusicCatalog for Catalog {
            async fn lookup_track(&self, title: &str, artist: &str) -> AppResult<LookedUpTrack>;
            async fn fetch_track_metadata(&self, track_id: &str) -> AppResult<TrackMetadata>;
            fn name(&self) -> &'static str;
        }
    }

    fn sample_metadata(id: &str) -> TrackMetadata {
        TrackMetadata {
            id: id.to_string(),
            name: format!("name {}", id),
            artist: format!("artist {}", id),
            artwork_url: format!("https://img.example/{}", id),
            link: format!("https://open.example/{}", id),
        }
    }

    #[tokio::test]
    async fn test_enrichment_preserves_input_order() {
        let mut provider = MockCatalog::new();
        provider
            .expect_fetch_track_metadata()
            .returning(|id| Ok(sample_metadata(id)));

        let ids: Vec<String> = vec!["c".into(), "a".into(), "b".into()];
        let result = enrich_recommendations(Arc::new(provider), &ids, 5).await;

        let metadata = assert_ok!(result);
        let out_ids: Vec<&str> = metadata.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(out_ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_enrichment_single_failure_fails_whole_request() {
        let mut provider = MockCatalog::new();
        provider.expect_fetch_track_metadata().returning(|id| {
            if id == "bad" {
                Err(AppError::CatalogService("boom".to_string()))
            } else {
                Ok(sample_metadata(id))
            }
        });

        let ids: Vec<String> = vec!["a".into(), "bad".into(), "c".into()];
        let result = enrich_recommendations(Arc::new(provider), &ids, 5).await;

        assert!(matches!(result, Err(AppError::Enrichment(_))));
    }

    #[tokio::test]
    async fn test_enrichment_empty_input_returns_empty() {
        let provider = MockCatalog::new();
        let result = enrich_recommendations(Arc::new(provider), &[], 5).await;
        assert_eq!(assert_ok!(result), vec![]);
    }

    #[tokio::test]
    async fn test_enrichment_zero_concurrency_still_makes_progress() {
        let mut provider = MockCatalog::new();
        provider
            .expect_fetch_track_metadata()
            .returning(|id| Ok(sample_metadata(id)));

        let ids: Vec<String> = vec!["a".into(), "b".into()];
        let result = enrich_recommendations(Arc::new(provider), &ids, 0).await;
        assert_eq!(assert_ok!(result).len(), 2);
    }
}
