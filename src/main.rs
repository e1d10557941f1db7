//! RAG Prep Service - Main Entry Point
//!
//! Exposes text splitting and citation normalization over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rag_prep::api::{self, handlers::AppState};
use rag_prep::splitter::TiktokenCounter;
use rag_prep::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "rag_prep=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ServiceConfig::from_env();
    config.splitter_config().validate()?;

    info!("Starting RAG Prep Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        chunk_size = config.default_chunk_size,
        chunk_overlap = config.default_chunk_overlap,
        length_function = ?config.length_function,
        "Default splitter settings"
    );

    let port = config.port;
    let state = Arc::new(AppState {
        token_counter: TiktokenCounter::new()?,
        config,
    });

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
