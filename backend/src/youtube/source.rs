//! Source traits for channel and video metadata.
//!
//! The benchmark pipeline never talks to an HTTP API directly; it goes
//! through these three collaborator traits so the live YouTube client and
//! the in-memory [`LocalSource`](super::LocalSource) are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::SourceResult;
use super::url::ChannelRef;
use crate::models::{ChannelInfo, DurationParse, VideoId, VideoMeta};

/// Maximum number of ids accepted by one detail request.
pub const MAX_DETAIL_BATCH: usize = 50;

/// One entry of a channel's uploads playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEntry {
    pub video_id: VideoId,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// One page of an uploads playlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadPage {
    pub entries: Vec<UploadEntry>,
    pub next_page_token: Option<String>,
}

/// Per-video details as returned by the detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: VideoId,
    pub title: String,
    pub published_at: DateTime<Utc>,
    /// Raw ISO-8601 duration, e.g. `PT4M13S`.
    pub duration_token: String,
    pub view_count: u64,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl VideoDetails {
    /// Convert into the analysis model, parsing the duration token.
    pub fn into_meta(self) -> VideoMeta {
        let duration = DurationParse::parse(&self.duration_token);
        if duration == DurationParse::Unparseable {
            warn!(
                video_id = %self.video_id,
                token = %self.duration_token,
                "Unparseable duration; classifying as long-form"
            );
        }

        VideoMeta {
            video_id: self.video_id,
            title: self.title,
            published_at: self.published_at,
            duration,
            view_count: self.view_count,
            like_count: self.like_count,
            comment_count: self.comment_count,
            thumbnail_url: self.thumbnail_url,
        }
    }
}

/// Resolves a channel reference to channel metadata.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared by HTTP handlers.
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    /// Check that the source is reachable and configured.
    async fn health_check(&self) -> SourceResult<bool>;

    /// Resolve a channel id, handle, custom URL or username.
    ///
    /// # Returns
    /// * `Ok(ChannelInfo)` - The channel metadata
    /// * `Err(SourceError::NotFound)` - If no channel matches
    async fn resolve_channel(&self, channel: &ChannelRef) -> SourceResult<ChannelInfo>;
}

/// Pages through a channel's uploads playlist.
#[async_trait]
pub trait VideoListProvider: Send + Sync {
    /// Fetch one page of at most `max_results` entries, newest first.
    ///
    /// # Arguments
    /// * `playlist_id` - The uploads playlist id from [`ChannelInfo`]
    /// * `page_token` - Token from the previous page, `None` for the first
    /// * `max_results` - Page size requested from the source
    async fn fetch_upload_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> SourceResult<UploadPage>;
}

/// Fetches per-video details.
#[async_trait]
pub trait VideoDetailProvider: Send + Sync {
    /// Fetch details for at most [`MAX_DETAIL_BATCH`] ids.
    ///
    /// Unknown ids are omitted from the result rather than failing the call.
    async fn fetch_video_details(&self, ids: &[VideoId]) -> SourceResult<Vec<VideoDetails>>;
}

/// Combined source trait used by the analysis pipeline.
pub trait VideoSource: ChannelResolver + VideoListProvider + VideoDetailProvider {}

// Blanket implementation: anything implementing the three collaborator traits is a source
impl<T> VideoSource for T where T: ChannelResolver + VideoListProvider + VideoDetailProvider {}
