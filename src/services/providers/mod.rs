/// Music catalog service abstraction
///
/// The external catalog service is consumed through this trait so that the
/// pipeline never touches the wire directly: the concrete Spotify client
/// lives in `spotify.rs`, and tests substitute a mock.
use crate::{
    error::AppResult,
    models::{LookedUpTrack, TrackMetadata},
};

pub mod spotify;

pub use spotify::SpotifyProvider;

/// Trait for the external music catalog service
#[async_trait::async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Resolve a (title, artist) pair to the single best-matching track
    ///
    /// Returns the track's audio attributes, popularity, release date and
    /// the primary artist's genre tags. Fails with `TrackNotFound` when the
    /// service has no match.
    async fn lookup_track(&self, title: &str, artist: &str) -> AppResult<LookedUpTrack>;

    /// Fetch display metadata for one track identifier
    ///
    /// Returns name, primary artist, artwork URL and external link.
    async fn fetch_track_metadata(&self, track_id: &str) -> AppResult<TrackMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
