//! Error types for the benchmark pipeline.

use crate::youtube::SourceError;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type for the trajectory/benchmark/comparison pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// An argument outside its documented domain (zero days, bad band width).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The channel or video reference could not be parsed from the input.
    #[error("Unrecognized reference: {0}")]
    UnrecognizedReference(String),

    /// The channel lookup returned no matching entity.
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// The target video lookup returned no matching entity.
    #[error("Video not found: {0}")]
    VideoNotFound(String),

    /// No reference trajectory survived filtering and the age threshold.
    #[error("Empty benchmark for channel {channel}: {details}")]
    EmptyBenchmark { channel: String, details: String },

    /// The video source failed for a reason other than a missing entity.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl AnalysisError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the input could not be resolved to a channel or video.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedReference(_) | Self::ChannelNotFound(_) | Self::VideoNotFound(_)
        )
    }
}
