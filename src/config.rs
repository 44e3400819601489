use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Spotify application client ID
    pub spotify_client_id: String,

    /// Spotify application client secret
    pub spotify_client_secret: String,

    /// Spotify Web API base URL
    #[serde(default = "default_spotify_api_url")]
    pub spotify_api_url: String,

    /// Spotify token endpoint for the client-credentials flow
    #[serde(default = "default_spotify_token_url")]
    pub spotify_token_url: String,

    /// Path to the static track catalog file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Worker pool width for parallel metadata enrichment
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_spotify_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_catalog_path() -> String {
    "data/tracks_with_genres.json".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_enrichment_concurrency() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
