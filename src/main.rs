use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_rec_api::{
    api::{create_router, AppState},
    artifacts::{ArtifactSources, ArtifactStore},
    config::Config,
    services::TmdbProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,movie_rec_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Artifacts are fetched on first run, then loaded once and shared read-only
    let sources = ArtifactSources::from_config(&config);
    sources
        .fetch_missing(&reqwest::Client::new())
        .await
        .context("Failed to fetch artifacts")?;

    let store = tokio::task::spawn_blocking(move || ArtifactStore::load(&sources))
        .await?
        .context("Failed to load artifacts")?;

    let provider = TmdbProvider::from_config(&config)?;
    let state = AppState::new(store, Arc::new(provider)).with_config(&config);

    let app = create_router(state, &config.cors_origins());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
