//! Grayband HTTP Server Binary
//!
//! Loads configuration, creates the video source and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Live YouTube Data API
//! YT_API_KEY=... cargo run --bin grayband-server
//!
//! # In-memory source loaded from a fixture
//! SOURCE_TYPE=local GRAYBAND_CONFIG=grayband.toml cargo run --bin grayband-server
//! ```
//!
//! # Environment Variables
//!
//! - `GRAYBAND_CONFIG`: Explicit path to `grayband.toml`
//! - `YT_API_KEY`: YouTube Data API key
//! - `SOURCE_TYPE`: `youtube` or `local`
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grayband::config::AppConfig;
use grayband::http::{create_router, AppState};
use grayband::youtube::SourceFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting grayband HTTP server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let source = SourceFactory::create(&config).context("Failed to create video source")?;
    info!(
        source = %config.source.source_type,
        max_videos = config.analysis.max_videos,
        band_width = config.analysis.band_width.percent(),
        "Video source initialized"
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;
    let app = create_router(AppState::new(source, config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
