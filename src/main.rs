use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tour_recommender::{
    api::{cors_layer, create_router, AppState},
    config::Config,
    services::RecommendationContext,
    store::FsCatalogSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Every table must load before the listener binds
    let source = FsCatalogSource::from_config(&config);
    let context = RecommendationContext::load(&source, &config)
        .await
        .context("Failed to load recommendation data")?;

    let mut app = create_router(AppState::new(context));
    if let Some(cors) = cors_layer(&config.cors_allowed_origins) {
        app = app.layer(cors);
    }

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
