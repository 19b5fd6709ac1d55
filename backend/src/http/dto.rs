//! Data Transfer Objects for the HTTP API.
//!
//! Analysis requests and reports are serialized as-is; only the small query
//! endpoints get dedicated types here.

use serde::{Deserialize, Serialize};

pub use crate::models::ChannelInfo;
pub use crate::services::{AnalysisReport, AnalysisRequest, ChartData};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Video source status: `connected`, `disconnected` or `error: ...`
    pub source: String,
}

/// Query parameters for channel resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveQuery {
    /// Channel id, `@handle` or channel URL
    pub channel: String,
}

/// Query parameters for duration parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationQuery {
    /// ISO-8601 duration token, e.g. `PT1M30S`
    pub token: String,
}

/// Parsed duration and the resulting classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationResponse {
    pub token: String,
    /// `None` when the token could not be parsed.
    pub seconds: Option<u64>,
    pub is_short: bool,
    pub shape: crate::models::ShapeClass,
}
