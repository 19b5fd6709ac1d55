//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for the browser frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Lookups
        .route("/channels/resolve", get(handlers::resolve_channel))
        .route("/duration", get(handlers::parse_duration))
        // Analysis and its renderings
        .route("/analysis", post(handlers::analyze))
        .route("/analysis/band.csv", post(handlers::band_csv))
        .route("/analysis/trajectories.csv", post(handlers::trajectories_csv))
        .route("/analysis/projection.csv", post(handlers::projection_csv))
        .route("/analysis/chart", post(handlers::chart));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
