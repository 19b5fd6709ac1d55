//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use super::dto::{
    AnalysisReport, AnalysisRequest, ChannelInfo, ChartData, DurationQuery, DurationResponse,
    HealthResponse, ResolveQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{DurationParse, ShapeClass};
use crate::services::{self, AnalysisError};
use crate::youtube::parse_channel_ref;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the video
/// source is usable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let source_status = match state.source.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        source: source_status,
    }))
}

// =============================================================================
// Lookups
// =============================================================================

/// GET /v1/channels/resolve?channel=...
pub async fn resolve_channel(
    State(state): State<AppState>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> HandlerResult<ChannelInfo> {
    let Query(query) = query?;
    let channel = parse_channel_ref(&query.channel)
        .ok_or_else(|| AnalysisError::UnrecognizedReference(query.channel.clone()))?;
    let info = state.source.resolve_channel(&channel).await.map_err(|e| {
        if e.is_not_found() {
            AppError::from(AnalysisError::ChannelNotFound(channel.to_string()))
        } else {
            AppError::from(e)
        }
    })?;
    Ok(Json(info))
}

/// GET /v1/duration?token=...
pub async fn parse_duration(
    query: Result<Query<DurationQuery>, QueryRejection>,
) -> HandlerResult<DurationResponse> {
    let Query(query) = query?;
    let parsed = DurationParse::parse(&query.token);
    let shape = if parsed.is_short() {
        ShapeClass::Short
    } else {
        ShapeClass::LongForm
    };

    Ok(Json(DurationResponse {
        token: query.token,
        seconds: parsed.seconds(),
        is_short: parsed.is_short(),
        shape,
    }))
}

// =============================================================================
// Analysis
// =============================================================================

async fn run(state: &AppState, request: &AnalysisRequest) -> Result<AnalysisReport, AppError> {
    let report = services::run_analysis(
        state.source.as_ref(),
        request,
        &state.config.analysis,
        state.config.youtube.page_size,
        Utc::now(),
    )
    .await?;
    Ok(report)
}

fn csv_response(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body)
}

/// POST /v1/analysis
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> HandlerResult<AnalysisReport> {
    let Json(request) = payload?;
    Ok(Json(run(&state, &request).await?))
}

/// POST /v1/analysis/band.csv
pub async fn band_csv(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let report = run(&state, &request).await?;
    Ok(csv_response(services::band_csv(&report.band)?))
}

/// POST /v1/analysis/trajectories.csv
pub async fn trajectories_csv(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let report = run(&state, &request).await?;
    Ok(csv_response(services::trajectories_csv(&report.trajectories)?))
}

/// POST /v1/analysis/projection.csv
pub async fn projection_csv(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let report = run(&state, &request).await?;
    Ok(csv_response(services::projection_csv(&report.projection)?))
}

/// POST /v1/analysis/chart
///
/// Chart payload styled with the configured theme.
pub async fn chart(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> HandlerResult<ChartData> {
    let Json(request) = payload?;
    let report = run(&state, &request).await?;
    Ok(Json(services::build_chart(&report, &state.config.theme)))
}
