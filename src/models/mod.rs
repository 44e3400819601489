use serde::{Deserialize, Serialize};

/// One track in the working table: audio attributes, genre tags and
/// release year, in the common schema shared by the static catalog and
/// freshly looked-up tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    /// Genre tags, already tokenized ("hip_hop", not "hip hop").
    /// A track without genres carries an empty list.
    pub genres: Vec<String>,
    pub tempo: f64,
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub speechiness: f64,
    pub instrumentalness: f64,
    /// 0-100, carried as f64 for the feature pipeline
    pub popularity: f64,
    pub release_year: i32,
    pub duration_min: f64,
}

/// Audio analysis attributes as returned by the audio-features endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub tempo: f64,
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub speechiness: f64,
    pub instrumentalness: f64,
    pub duration_ms: u64,
}

/// Raw result of resolving a (title, artist) pair against the external
/// catalog service, before conversion into the common `TrackRecord` schema.
/// Genre tags are verbatim from the service and may contain spaces; the
/// release date is the raw date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookedUpTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    pub release_date: String,
    pub audio: AudioFeatures,
}

/// Display metadata for one recommended track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artwork_url: String,
    pub link: String,
}

/// One ranked recommendation: track identifier plus its cosine similarity
/// to the user's track.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTrack {
    pub id: String,
    pub score: f64,
}

/// Request body for the recommendations endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    pub artist: String,
}

/// Echo of the resolved user track, returned for display confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTrack {
    pub name: String,
    pub artist: String,
}

/// One recommended track as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedTrack {
    pub name: String,
    pub artist: String,
    pub link: String,
    pub artwork_url: String,
}

/// Response body for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub seed: SeedTrack,
    pub recommendations: Vec<RecommendedTrack>,
}

// ============================================================================
// Spotify Web API Types
// ============================================================================

/// Response from GET /v1/search?type=track
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchResponse {
    pub tracks: ApiTrackPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrackPage {
    pub items: Vec<ApiTrack>,
}

/// Track object from search results and GET /v1/tracks/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    pub album: ApiAlbum,
    #[serde(default)]
    pub artists: Vec<ApiArtistRef>,
    #[serde(default)]
    pub external_urls: ApiExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiAlbum {
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub artists: Vec<ApiArtistRef>,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

/// Simplified artist object nested in tracks and albums
#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtistRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Full artist object from GET /v1/artists/{id}, carrying the genre tags
#[derive(Debug, Clone, Deserialize)]
pub struct ApiArtist {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}
