/// Spotify Web API provider
///
/// Implements `MusicCatalog` against the Spotify Web API using the
/// client-credentials OAuth flow.
///
/// API Flow for a lookup:
/// 1. /v1/search (type=track, limit=1) → best match with album + popularity
/// 2. /v1/audio-features/{id} → audio analysis attributes
/// 3. /v1/artists/{id} → primary album artist's name and genre tags
///
/// Enrichment uses /v1/tracks/{id} for display metadata.
use chrono::{DateTime, Duration, Utc};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    models::{ApiArtist, ApiSearchResponse, ApiTrack, AudioFeatures, LookedUpTrack, TrackMetadata},
    services::providers::MusicCatalog,
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const METADATA_CACHE_TTL: u64 = 604800; // 1 week

/// Tokens within this margin of expiry are refreshed eagerly
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

/// In-process access token from the client-credentials flow
#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    api_url: String,
    token_url: String,
    cache: Cache,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl SpotifyProvider {
    pub fn new(
        cache: Cache,
        client_id: String,
        client_secret: String,
        api_url: String,
        token_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id,
            client_secret,
            api_url,
            token_url,
            cache,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns a valid access token, refreshing it through the token
    /// endpoint when missing or near expiry.
    async fn access_token(&self) -> AppResult<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.is_expired() {
                    return Ok(token.value.clone());
                }
            }
        }

        let mut guard = self.token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = guard.as_ref() {
            if !token.is_expired() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogService(format!(
                "Spotify token endpoint returned status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let token = AccessToken {
            value: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        };
        let value = token.value.clone();
        *guard = Some(token);

        tracing::debug!(provider = "spotify", "Access token refreshed");

        Ok(value)
    }

    /// Authenticated GET returning deserialized JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogService(format!(
                "Spotify API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MusicCatalog for SpotifyProvider {
    async fn lookup_track(&self, title: &str, artist: &str) -> AppResult<LookedUpTrack> {
        cached!(
            self.cache,
            CacheKey::TrackSearch(title.to_string(), artist.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let query = format!("track: {} artist: {}", title, artist);
                let url = format!("{}/v1/search", self.api_url);

                let search: ApiSearchResponse = self
                    .get_json(&url, &[("q", query.as_str()), ("type", "track"), ("limit", "1")])
                    .await?;

                let hit = search.tracks.items.into_iter().next().ok_or_else(|| {
                    AppError::TrackNotFound(format!(
                        "No match for track '{}' by '{}'",
                        title, artist
                    ))
                })?;

                let audio: AudioFeatures = self
                    .get_json(
                        &format!("{}/v1/audio-features/{}", self.api_url, hit.id),
                        &[],
                    )
                    .await?;

                let artist_ref = hit.album.artists.first().ok_or_else(|| {
                    AppError::CatalogService(format!("Track {} has no album artist", hit.id))
                })?;

                let artist_info: ApiArtist = self
                    .get_json(&format!("{}/v1/artists/{}", self.api_url, artist_ref.id), &[])
                    .await?;

                tracing::info!(
                    track_id = %hit.id,
                    name = %hit.name,
                    artist = %artist_info.name,
                    genres = artist_info.genres.len(),
                    provider = "spotify",
                    "Track lookup completed"
                );

                Ok::<_, AppError>(LookedUpTrack {
                    id: hit.id,
                    name: hit.name,
                    artist: artist_info.name,
                    genres: artist_info.genres,
                    popularity: hit.popularity,
                    release_date: hit.album.release_date,
                    audio,
                })
            }
        )
    }

    async fn fetch_track_metadata(&self, track_id: &str) -> AppResult<TrackMetadata> {
        cached!(
            self.cache,
            CacheKey::TrackMeta(track_id.to_string()),
            METADATA_CACHE_TTL,
            async move {
                let url = format!("{}/v1/tracks/{}", self.api_url, track_id);
                let track: ApiTrack = self.get_json(&url, &[]).await?;

                let artist = track
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .ok_or_else(|| {
                        AppError::CatalogService(format!("Track {} has no artist", track.id))
                    })?;

                let artwork_url = track
                    .album
                    .images
                    .first()
                    .map(|i| i.url.clone())
                    .ok_or_else(|| {
                        AppError::CatalogService(format!("Track {} has no artwork", track.id))
                    })?;

                let link = track.external_urls.spotify.clone().ok_or_else(|| {
                    AppError::CatalogService(format!("Track {} has no external link", track.id))
                })?;

                tracing::debug!(
                    track_id = %track.id,
                    provider = "spotify",
                    "Track metadata fetched"
                );

                Ok::<_, AppError>(TrackMetadata {
                    id: track.id,
                    name: track.name,
                    artist,
                    artwork_url,
                    link,
                })
            }
        )
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
