use std::collections::HashSet;

use crate::{
    catalog::CatalogTable,
    error::{AppError, AppResult},
    models::TrackRecord,
};

/// Builds the per-request working table: the user's track prepended to the
/// static catalog, deduplicated.
///
/// The user row goes in front, so first-occurrence-wins deduplication
/// guarantees a freshly fetched track shadows any catalog duplicate, and
/// the user's track is always present exactly once.
pub fn merge_user_track(
    user_track: TrackRecord,
    catalog: &CatalogTable,
) -> AppResult<Vec<TrackRecord>> {
    let mut merged = Vec::with_capacity(catalog.len() + 1);
    merged.push(user_track);
    merged.extend(catalog.tracks().iter().cloned());

    let merged = dedup_tracks(merged);

    if merged.is_empty() {
        return Err(AppError::DataIntegrity(
            "Merged working table has no rows".to_string(),
        ));
    }

    tracing::debug!(rows = merged.len(), "Working table merged");

    Ok(merged)
}

/// Removes duplicate tracks, keeping the first occurrence.
///
/// Two passes: first by exact (artist, name) pair, then by identifier.
pub fn dedup_tracks(tracks: Vec<TrackRecord>) -> Vec<TrackRecord> {
    let mut seen_pairs = HashSet::new();
    let by_pair: Vec<TrackRecord> = tracks
        .into_iter()
        .filter(|t| seen_pairs.insert((t.artist.clone(), t.name.clone())))
        .collect();

    let mut seen_ids = HashSet::new();
    by_pair
        .into_iter()
        .filter(|t| seen_ids.insert(t.id.clone()))
        .collect()
}
