mod comments;
mod config;
mod db;
mod errors;
mod models;
mod products;
mod routes;
mod state;
mod store;
mod tags;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::seed::seed_sample_data;
use crate::store::{InsightStore, MemoryStore, PgStore};
use crate::tags::TagVocabulary;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Insights API v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = Arc::new(load_vocabulary(&config)?);
    info!("Tag vocabulary loaded ({} tags)", vocabulary.len());

    let store = build_store(&config, &vocabulary).await?;

    let state = AppState {
        store,
        vocabulary,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_vocabulary(config: &Config) -> Result<TagVocabulary> {
    match &config.tag_vocabulary_path {
        Some(path) => TagVocabulary::from_json_file(path)
            .with_context(|| format!("Failed to load tag vocabulary from {}", path.display())),
        None => TagVocabulary::builtin().context("Built-in tag vocabulary is invalid"),
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
async fn build_store(
    config: &Config,
    vocabulary: &TagVocabulary,
) -> Result<Arc<dyn InsightStore>> {
    if let Some(database_url) = &config.database_url {
        let pool = create_pool(database_url, config.database_max_connections).await?;
        info!("PostgreSQL store ready");
        if config.seed_sample_data {
            warn!("SEED_SAMPLE_DATA only applies to the in-memory store; ignoring");
        }
        return Ok(Arc::new(PgStore::new(pool)));
    }

    let store = MemoryStore::new();
    info!("DATABASE_URL not set, using in-memory store");
    if config.seed_sample_data {
        let created = seed_sample_data(&store, vocabulary)
            .await
            .context("Failed to seed sample data")?;
        info!("Seeded {created} sample comments");
    }
    Ok(Arc::new(store))
}
