use std::sync::Arc;

use movie_sentiment_api::{
    api::{cors_layer, create_router, AppState},
    config::Config,
    services::{CatalogProvider, SentimentClassifier, TmdbProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let classifier = SentimentClassifier::load(&config.model_path, &config.vectorizer_path);

    let catalog = TmdbProvider::new(
        config.api_key(),
        config.tmdb_base_url.clone(),
        config.tmdb_language.clone(),
    )?;
    if !catalog.has_api_key() {
        tracing::warn!("TMDB_API_KEY not set, catalog lookups will return no data");
    }
    tracing::info!(
        provider = catalog.name(),
        base_url = %config.tmdb_base_url,
        "Catalog provider ready"
    );

    let state = AppState::new(Arc::new(catalog), classifier);
    let app = create_router(state, cors_layer(config.cors_origins()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
