use crate::{
    error::{AppError, AppResult},
    models::{LookedUpTrack, TrackRecord},
    services::providers::MusicCatalog,
};

/// Resolves the user-entered (title, artist) pair to one `TrackRecord`
///
/// Drives the catalog-service lookup and converts the raw result into the
/// common schema shared with the static catalog: release date truncated to
/// its year, duration in minutes, genre tags tokenized with underscores.
pub async fn lookup_user_track(
    provider: &dyn MusicCatalog,
    title: &str,
    artist: &str,
) -> AppResult<TrackRecord> {
    let title = title.trim();
    let artist = artist.trim();

    if title.is_empty() || artist.is_empty() {
        return Err(AppError::InvalidInput(
            "Both title and artist must be provided".to_string(),
        ));
    }

    let looked_up = provider.lookup_track(title, artist).await?;

    tracing::debug!(
        track_id = %looked_up.id,
        name = %looked_up.name,
        "User track resolved"
    );

    track_record_from_lookup(looked_up)
}

/// Converts a raw lookup result into the common `TrackRecord` schema
fn track_record_from_lookup(track: LookedUpTrack) -> AppResult<TrackRecord> {
    let release_year = parse_release_year(&track.release_date)?;

    Ok(TrackRecord {
        id: track.id,
        name: track.name,
        artist: track.artist,
        genres: track.genres.iter().map(|g| normalize_genre_tag(g)).collect(),
        tempo: track.audio.tempo,
        valence: track.audio.valence,
        energy: track.audio.energy,
        danceability: track.audio.danceability,
        acousticness: track.audio.acousticness,
        speechiness: track.audio.speechiness,
        instrumentalness: track.audio.instrumentalness,
        popularity: track.popularity as f64,
        release_year,
        duration_min: track.audio.duration_ms as f64 / 60_000.0,
    })
}

/// Joins internal spaces with underscores so service genre tags match the
/// catalog's tokenization ("hip hop" → "hip_hop")
fn normalize_genre_tag(tag: &str) -> String {
    tag.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Truncates a release date to its year.
///
/// Accepts bare years ("1974") and full dates ("1974-06-17").
fn parse_release_year(date: &str) -> AppResult<i32> {
    date.split('-')
        .next()
        .and_then(|y| y.trim().parse().ok())
        .ok_or_else(|| {
            AppError::CatalogService(format!("Malformed release date: {:?}", date))
        })
}
