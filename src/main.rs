use std::sync::Arc;

use segue_api::{
    cache::{create_redis_client, Cache},
    catalog,
    config::Config,
    routes::{create_router, AppState},
    services::providers::SpotifyProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segue_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    // Startup-class failure: refuse to serve against a broken catalog
    let catalog = Arc::new(catalog::load_catalog(&config.catalog_path)?);

    let provider = Arc::new(SpotifyProvider::new(
        cache,
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
        config.spotify_api_url.clone(),
        config.spotify_token_url.clone(),
    ));

    let state = Arc::new(AppState {
        catalog,
        provider,
        enrichment_concurrency: config.enrichment_concurrency,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
}
