mod config;
mod errors;
mod extraction;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::entity::{build_recognizer, load_name_lexicon};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Extra given names for the gazetteer, if configured
    let extra_names = match &config.name_lexicon_path {
        Some(path) => {
            let names = load_name_lexicon(path)
                .with_context(|| format!("failed to read name lexicon {}", path.display()))?;
            info!("Loaded {} names from {}", names.len(), path.display());
            names
        }
        None => Vec::new(),
    };

    // Initialize name recognizer (gazetteer by default; swap via NER_BACKEND)
    let recognizer = build_recognizer(config.ner_backend, &extra_names);
    info!("Entity recognizer initialized (backend: {})", recognizer.backend());
    info!("Upload limit: {} bytes", config.max_upload_bytes);

    // Build app state
    let state = AppState::new(config.clone(), recognizer);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
