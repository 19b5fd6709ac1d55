//! # Grayband
//!
//! Channel-relative performance benchmark for YouTube videos.
//!
//! Given a channel and a target video, the crate pulls the channel's recent
//! uploads, synthesizes a daily cumulative-view trajectory for each reference
//! video, aggregates them into a per-day percentile band (the "gray band"),
//! ranks the target against that band and projects its curve forward.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types (durations, videos, trajectories, bands, ranks)
//! - [`youtube`]: Video sources (YouTube Data API, in-memory) and URL parsing
//! - [`services`]: Trajectory generation, band aggregation, comparison,
//!   projection, the analysis pipeline and its CSV / chart renderings
//! - [`config`]: `grayband.toml` and environment overrides
//! - [`http`]: Axum-based REST API (feature `http-server`)

// Allow large error types - SourceError carries structured context
#![allow(clippy::result_large_err)]

pub mod config;
pub mod models;
pub mod services;
pub mod youtube;

#[cfg(feature = "http-server")]
pub mod http;
