//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{AnalysisError, ExportError};
use crate::youtube::SourceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Analysis pipeline error
    Analysis(AnalysisError),
    /// Video source error outside an analysis
    Source(SourceError),
}

fn source_error_parts(err: &SourceError) -> (StatusCode, ApiError) {
    let error = match err {
        SourceError::NotFound { message, .. } => {
            return (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message.clone()));
        }
        SourceError::ConfigurationError { message, .. } => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIGURATION_ERROR", message.clone()),
            );
        }
        SourceError::TimeoutError { message, .. } => ApiError::new("UPSTREAM_TIMEOUT", message.clone()),
        SourceError::ConnectionError { message, .. }
        | SourceError::QueryError { message, .. }
        | SourceError::MalformedResponse { message, .. } => {
            ApiError::new("UPSTREAM_ERROR", message.clone())
        }
    };
    (StatusCode::BAD_GATEWAY, error.with_details(err.context().to_string()))
}

impl AppError {
    /// Status code and body for this error.
    pub fn parts(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Source(e) => source_error_parts(e),
            AppError::Analysis(e) => {
                let msg = e.to_string();
                match e {
                    AnalysisError::InvalidArgument(_) => {
                        (StatusCode::BAD_REQUEST, ApiError::new("INVALID_ARGUMENT", msg))
                    }
                    AnalysisError::UnrecognizedReference(_) => (
                        StatusCode::BAD_REQUEST,
                        ApiError::new("UNRECOGNIZED_REFERENCE", msg),
                    ),
                    AnalysisError::ChannelNotFound(_) => {
                        (StatusCode::NOT_FOUND, ApiError::new("CHANNEL_NOT_FOUND", msg))
                    }
                    AnalysisError::VideoNotFound(_) => {
                        (StatusCode::NOT_FOUND, ApiError::new("VIDEO_NOT_FOUND", msg))
                    }
                    AnalysisError::EmptyBenchmark { details, .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ApiError::new("EMPTY_BENCHMARK", msg.clone()).with_details(details.clone()),
                    ),
                    AnalysisError::Source(source) => source_error_parts(source),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();
        if status.is_server_error() {
            tracing::error!(code = %error.code, message = %error.message, "Request failed");
        }
        (status, Json(error)).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::Source(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Internal(err.to_string())
    }
}
