//! YouTube Data API v3 source.
//!
//! Only public, API-key authenticated endpoints are used: `channels`,
//! `search` (custom URL fallback), `playlistItems` and `videos`. Counts come
//! back as decimal strings and are parsed here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::error::{ErrorContext, SourceError, SourceResult};
use super::source::{
    ChannelResolver, UploadEntry, UploadPage, VideoDetailProvider, VideoDetails,
    VideoListProvider, MAX_DETAIL_BATCH,
};
use super::url::ChannelRef;
use crate::config::YouTubeSettings;
use crate::models::{ChannelId, ChannelInfo, VideoId};

/// Live source backed by the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeSource {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

// ==================== Wire types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    view_count: Option<String>,
    subscriber_count: Option<String>,
    video_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    snippet: Option<PlaylistSnippet>,
    content_details: PlaylistContentDetails,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    video_id: String,
    video_published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: VideoContentDetails,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

// ==================== Conversions ====================

fn parse_count(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

fn channel_info_from_item(item: ChannelItem) -> SourceResult<ChannelInfo> {
    let context = || {
        ErrorContext::new("resolve_channel")
            .with_entity("channel")
            .with_entity_id(&item.id)
    };

    let uploads_playlist_id = item
        .content_details
        .as_ref()
        .map(|c| c.related_playlists.uploads.clone())
        .ok_or_else(|| SourceError::malformed_with_context("missing contentDetails", context()))?;
    let channel_name = item
        .snippet
        .as_ref()
        .map(|s| s.title.clone())
        .unwrap_or_default();
    let statistics = item.statistics.as_ref();

    Ok(ChannelInfo {
        channel_id: ChannelId::new(item.id.clone()),
        channel_name,
        subscriber_count: statistics
            .filter(|s| !s.hidden_subscriber_count)
            .and_then(|s| parse_count(s.subscriber_count.as_deref())),
        total_view_count: statistics
            .and_then(|s| parse_count(s.view_count.as_deref()))
            .unwrap_or(0),
        total_video_count: statistics
            .and_then(|s| parse_count(s.video_count.as_deref()))
            .unwrap_or(0),
        uploads_playlist_id,
    })
}

fn upload_entry_from_item(item: PlaylistItem) -> UploadEntry {
    UploadEntry {
        video_id: VideoId::new(item.content_details.video_id),
        title: item.snippet.map(|s| s.title).unwrap_or_default(),
        published_at: item.content_details.video_published_at,
    }
}

fn video_details_from_item(item: VideoItem) -> VideoDetails {
    let statistics = item.statistics.as_ref();
    let thumbnails = &item.snippet.thumbnails;
    let thumbnail_url = ["high", "medium", "default"]
        .iter()
        .find_map(|size| thumbnails.get(*size))
        .map(|t| t.url.clone());

    VideoDetails {
        video_id: VideoId::new(item.id),
        title: item.snippet.title,
        published_at: item.snippet.published_at,
        duration_token: item.content_details.duration,
        // Hidden or missing view counts are treated as zero.
        view_count: statistics
            .and_then(|s| parse_count(s.view_count.as_deref()))
            .unwrap_or(0),
        like_count: statistics.and_then(|s| parse_count(s.like_count.as_deref())),
        comment_count: statistics.and_then(|s| parse_count(s.comment_count.as_deref())),
        thumbnail_url,
    }
}

// ==================== Client ====================

impl YouTubeSource {
    /// Create a client from settings; an API key is required.
    pub fn new(settings: &YouTubeSettings) -> SourceResult<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(SourceError::configuration(
                "YouTube source requires an API key (youtube.api_key or YT_API_KEY)",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SourceError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        context: ErrorContext,
    ) -> SourceResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let operation = context.operation.clone().unwrap_or_else(|| endpoint.to_string());
        debug!(endpoint, "YouTube API request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::from(e).with_operation(operation.clone()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from(e).with_operation(operation))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| format!("{} ({})", b.error.message, b.error.code))
                .unwrap_or_else(|_| body.trim().to_string());
            let context = context.with_details(format!("status={}", status.as_u16()));
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                SourceError::not_found_with_context(message, context)
            } else {
                SourceError::query_with_context(message, context)
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| SourceError::malformed_with_context(e.to_string(), context))
    }

    async fn channel_by(&self, key: &str, value: String, channel: &ChannelRef) -> SourceResult<ChannelInfo> {
        let context = ErrorContext::new("resolve_channel")
            .with_entity("channel")
            .with_entity_id(channel);
        let response: ListResponse<ChannelItem> = self
            .get(
                "channels",
                &[("part", "snippet,statistics,contentDetails".to_string()), (key, value)],
                context.clone(),
            )
            .await?;

        let item = response.items.into_iter().next().ok_or_else(|| {
            SourceError::not_found_with_context("No channel matches the reference", context)
        })?;
        channel_info_from_item(item)
    }
}

#[async_trait]
impl ChannelResolver for YouTubeSource {
    async fn health_check(&self) -> SourceResult<bool> {
        Ok(!self.api_key.is_empty())
    }

    async fn resolve_channel(&self, channel: &ChannelRef) -> SourceResult<ChannelInfo> {
        match channel {
            ChannelRef::Id(id) => self.channel_by("id", id.to_string(), channel).await,
            ChannelRef::Handle(handle) => {
                self.channel_by("forHandle", format!("@{}", handle), channel).await
            }
            ChannelRef::Username(name) => self.channel_by("forUsername", name.clone(), channel).await,
            ChannelRef::CustomUrl(name) => {
                // Custom URLs have no direct lookup; take the best search hit.
                let context = ErrorContext::new("resolve_channel")
                    .with_entity("channel")
                    .with_entity_id(channel)
                    .with_details("custom url search");
                let response: ListResponse<SearchItem> = self
                    .get(
                        "search",
                        &[
                            ("part", "snippet".to_string()),
                            ("type", "channel".to_string()),
                            ("maxResults", "1".to_string()),
                            ("q", name.clone()),
                        ],
                        context.clone(),
                    )
                    .await?;
                let channel_id = response
                    .items
                    .into_iter()
                    .find_map(|item| item.id.channel_id)
                    .ok_or_else(|| {
                        SourceError::not_found_with_context("No channel matches the custom URL", context)
                    })?;
                self.channel_by("id", channel_id, channel).await
            }
        }
    }
}

#[async_trait]
impl VideoListProvider for YouTubeSource {
    async fn fetch_upload_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> SourceResult<UploadPage> {
        let mut params = vec![
            ("part", "snippet,contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", max_results.clamp(1, 50).to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response: ListResponse<PlaylistItem> = self
            .get(
                "playlistItems",
                &params,
                ErrorContext::new("fetch_upload_page")
                    .with_entity("playlist")
                    .with_entity_id(playlist_id),
            )
            .await?;

        Ok(UploadPage {
            entries: response.items.into_iter().map(upload_entry_from_item).collect(),
            next_page_token: response.next_page_token,
        })
    }
}

#[async_trait]
impl VideoDetailProvider for YouTubeSource {
    async fn fetch_video_details(&self, ids: &[VideoId]) -> SourceResult<Vec<VideoDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let context = ErrorContext::new("fetch_video_details").with_entity("video");
        if ids.len() > MAX_DETAIL_BATCH {
            return Err(SourceError::query_with_context(
                format!("At most {} ids per request, got {}", MAX_DETAIL_BATCH, ids.len()),
                context,
            ));
        }

        let joined = ids.iter().map(VideoId::as_str).collect::<Vec<_>>().join(",");
        let response: ListResponse<VideoItem> = self
            .get(
                "videos",
                &[
                    ("part", "snippet,contentDetails,statistics".to_string()),
                    ("id", joined),
                    ("maxResults", MAX_DETAIL_BATCH.to_string()),
                ],
                context,
            )
            .await?;

        Ok(response.items.into_iter().map(video_details_from_item).collect())
    }
}
