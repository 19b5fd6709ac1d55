//! In-memory video source.
//!
//! This source stores channels and videos in memory, making it suitable for
//! tests, offline development and demos from a JSON fixture. It honours the
//! same pagination and batching contract as the live API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::error::{ErrorContext, SourceError, SourceResult};
use super::source::{
    ChannelResolver, UploadEntry, UploadPage, VideoDetailProvider, VideoDetails,
    VideoListProvider, MAX_DETAIL_BATCH,
};
use super::url::ChannelRef;
use crate::models::{ChannelId, ChannelInfo, VideoId};

/// In-memory video source.
///
/// # Example
/// ```ignore
/// let source = LocalSource::new();
/// source.add_channel(channel_info, Some("creator"));
/// source.add_video(&channel_info.uploads_playlist_id, details);
/// let info = source.resolve_channel(&ChannelRef::Handle("creator".into())).await?;
/// ```
#[derive(Clone)]
pub struct LocalSource {
    data: Arc<RwLock<LocalData>>,
}

struct LocalChannel {
    info: ChannelInfo,
    aliases: Vec<ChannelRef>,
}

struct LocalData {
    channels: Vec<LocalChannel>,
    /// Playlist id -> video ids in insertion order.
    playlists: HashMap<String, Vec<VideoId>>,
    videos: HashMap<VideoId, VideoDetails>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            playlists: HashMap::new(),
            videos: HashMap::new(),
            is_healthy: true,
        }
    }
}

/// JSON fixture layout accepted by [`LocalSource::from_fixture_str`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalFixture {
    pub channels: Vec<FixtureChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureChannel {
    pub channel: ChannelInfo,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub videos: Vec<VideoDetails>,
}

impl LocalSource {
    /// Create a new empty local source.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Build a source from a JSON fixture string.
    pub fn from_fixture_str(json: &str) -> SourceResult<Self> {
        let fixture: LocalFixture = serde_json::from_str(json)
            .map_err(|e| SourceError::configuration(format!("Invalid local fixture: {}", e)))?;

        let source = Self::new();
        for entry in fixture.channels {
            let playlist = entry.channel.uploads_playlist_id.clone();
            source.add_channel(entry.channel, entry.handle.as_deref());
            for video in entry.videos {
                source.add_video(&playlist, video);
            }
        }
        Ok(source)
    }

    /// Build a source from a JSON fixture file.
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SourceError::configuration(format!(
                "Failed to read fixture {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_fixture_str(&content)
    }

    fn read(&self) -> RwLockReadGuard<'_, LocalData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocalData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a channel, optionally reachable through an `@handle`.
    pub fn add_channel(&self, info: ChannelInfo, handle: Option<&str>) {
        let mut aliases = vec![ChannelRef::Id(info.channel_id.clone())];
        if let Some(handle) = handle {
            aliases.push(ChannelRef::Handle(handle.trim_start_matches('@').to_string()));
        }

        let mut data = self.write();
        data.playlists
            .entry(info.uploads_playlist_id.clone())
            .or_default();
        data.channels.push(LocalChannel { info, aliases });
    }

    /// Make an existing channel reachable through another reference.
    pub fn add_alias(&self, channel_id: &ChannelId, alias: ChannelRef) -> SourceResult<()> {
        let mut data = self.write();
        let channel = data
            .channels
            .iter_mut()
            .find(|c| &c.info.channel_id == channel_id)
            .ok_or_else(|| SourceError::not_found(format!("Channel {} not found", channel_id)))?;
        channel.aliases.push(alias);
        Ok(())
    }

    /// Append a video to an uploads playlist.
    pub fn add_video(&self, playlist_id: &str, video: VideoDetails) {
        let mut data = self.write();
        data.playlists
            .entry(playlist_id.to_string())
            .or_default()
            .push(video.video_id.clone());
        data.videos.insert(video.video_id.clone(), video);
    }

    /// Store a video that belongs to no known playlist.
    pub fn add_unlisted_video(&self, video: VideoDetails) {
        self.write().videos.insert(video.video_id.clone(), video);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.write().is_healthy = healthy;
    }

    /// Get the number of videos stored.
    pub fn video_count(&self) -> usize {
        self.read().videos.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> SourceResult<()> {
        if !self.read().is_healthy {
            return Err(SourceError::connection("Local source is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

fn alias_matches(alias: &ChannelRef, wanted: &ChannelRef) -> bool {
    match (alias, wanted) {
        (ChannelRef::Id(a), ChannelRef::Id(b)) => a == b,
        (ChannelRef::Handle(a), ChannelRef::Handle(b))
        | (ChannelRef::CustomUrl(a), ChannelRef::CustomUrl(b))
        | (ChannelRef::Username(a), ChannelRef::Username(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

#[async_trait]
impl ChannelResolver for LocalSource {
    async fn health_check(&self) -> SourceResult<bool> {
        Ok(self.read().is_healthy)
    }

    async fn resolve_channel(&self, channel: &ChannelRef) -> SourceResult<ChannelInfo> {
        self.check_health()?;
        let data = self.read();
        data.channels
            .iter()
            .find(|c| c.aliases.iter().any(|alias| alias_matches(alias, channel)))
            .map(|c| c.info.clone())
            .ok_or_else(|| {
                SourceError::not_found_with_context(
                    "No channel matches the reference",
                    ErrorContext::new("resolve_channel")
                        .with_entity("channel")
                        .with_entity_id(channel),
                )
            })
    }
}

#[async_trait]
impl VideoListProvider for LocalSource {
    async fn fetch_upload_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> SourceResult<UploadPage> {
        self.check_health()?;
        let context = || {
            ErrorContext::new("fetch_upload_page")
                .with_entity("playlist")
                .with_entity_id(playlist_id)
        };

        let offset = match page_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                SourceError::query_with_context(
                    format!("Invalid page token: {}", token),
                    context(),
                )
            })?,
            None => 0,
        };

        let data = self.read();
        let ids = data.playlists.get(playlist_id).ok_or_else(|| {
            SourceError::not_found_with_context("Playlist not found", context())
        })?;

        let mut uploads: Vec<&VideoDetails> =
            ids.iter().filter_map(|id| data.videos.get(id)).collect();
        uploads.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let end = (offset + max_results.max(1)).min(uploads.len());
        let entries = uploads
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|v| UploadEntry {
                video_id: v.video_id.clone(),
                title: v.title.clone(),
                published_at: Some(v.published_at),
            })
            .collect();
        let next_page_token = (end < uploads.len()).then(|| end.to_string());

        Ok(UploadPage {
            entries,
            next_page_token,
        })
    }
}

#[async_trait]
impl VideoDetailProvider for LocalSource {
    async fn fetch_video_details(&self, ids: &[VideoId]) -> SourceResult<Vec<VideoDetails>> {
        self.check_health()?;
        if ids.len() > MAX_DETAIL_BATCH {
            return Err(SourceError::query_with_context(
                format!("At most {} ids per request, got {}", MAX_DETAIL_BATCH, ids.len()),
                ErrorContext::new("fetch_video_details").with_entity("video"),
            ));
        }

        let data = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| data.videos.get(id).cloned())
            .collect())
    }
}

/// Channel metadata with derived uploads playlist id, for tests.
#[cfg(test)]
pub(crate) fn fixture_channel(channel_id: &str) -> ChannelInfo {
    ChannelInfo {
        channel_id: ChannelId::new(channel_id),
        channel_name: "Fixture Channel".to_string(),
        subscriber_count: Some(1_000),
        total_view_count: 1_000_000,
        total_video_count: 100,
        uploads_playlist_id: format!("UU{}", &channel_id[2..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const CHANNEL: &str = "UCxxxxxxxxxxxxxxxxxxxxxx";
    const UPLOADS: &str = "UUxxxxxxxxxxxxxxxxxxxxxx";

    fn video(id: &str, day: u32) -> VideoDetails {
        VideoDetails {
            video_id: VideoId::new(id),
            title: id.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            duration_token: "PT5M".to_string(),
            view_count: 100,
            like_count: Some(5),
            comment_count: None,
            thumbnail_url: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_by_id_and_handle() {
        let source = LocalSource::new();
        source.add_channel(fixture_channel(CHANNEL), Some("@Creator"));

        let by_id = source
            .resolve_channel(&ChannelRef::Id(ChannelId::new(CHANNEL)))
            .await
            .unwrap();
        assert_eq!(by_id.uploads_playlist_id, UPLOADS);

        let by_handle = source
            .resolve_channel(&ChannelRef::Handle("creator".into()))
            .await
            .unwrap();
        assert_eq!(by_handle.channel_id, by_id.channel_id);
    }

    #[tokio::test]
    async fn test_resolve_alias_and_missing() {
        let source = LocalSource::new();
        source.add_channel(fixture_channel(CHANNEL), None);
        source
            .add_alias(&ChannelId::new(CHANNEL), ChannelRef::CustomUrl("Legacy".into()))
            .unwrap();

        assert!(source
            .resolve_channel(&ChannelRef::CustomUrl("legacy".into()))
            .await
            .is_ok());
        let err = source
            .resolve_channel(&ChannelRef::Username("nobody".into()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_pages_newest_first() {
        let source = LocalSource::new();
        source.add_channel(fixture_channel(CHANNEL), None);
        for (id, day) in [("aaaaaaaaaaa", 1), ("ccccccccccc", 3), ("bbbbbbbbbbb", 2)] {
            source.add_video(UPLOADS, video(id, day));
        }

        let first = source.fetch_upload_page(UPLOADS, None, 2).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[0].video_id, VideoId::new("ccccccccccc"));
        let token = first.next_page_token.unwrap();

        let second = source.fetch_upload_page(UPLOADS, Some(&token), 2).await.unwrap();
        assert_eq!(second.entries.len(), 1);
        assert_eq!(second.entries[0].video_id, VideoId::new("aaaaaaaaaaa"));
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_unknown_playlist() {
        let source = LocalSource::new();
        let err = source.fetch_upload_page("UUnope", None, 10).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_detail_batch_limit() {
        let source = LocalSource::new();
        let ids: Vec<VideoId> = (0..51).map(|i| VideoId::new(format!("v{:010}", i))).collect();
        assert!(source.fetch_video_details(&ids).await.is_err());
        assert!(source.fetch_video_details(&ids[..50]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_source_fails() {
        let source = LocalSource::new();
        source.add_channel(fixture_channel(CHANNEL), None);
        source.set_healthy(false);
        assert!(!source.health_check().await.unwrap());
        assert!(source
            .resolve_channel(&ChannelRef::Id(ChannelId::new(CHANNEL)))
            .await
            .is_err());
    }

    #[test]
    fn test_fixture_round_trip() {
        let fixture = LocalFixture {
            channels: vec![FixtureChannel {
                channel: fixture_channel(CHANNEL),
                handle: Some("creator".into()),
                videos: vec![video("aaaaaaaaaaa", 1), video("bbbbbbbbbbb", 2)],
            }],
        };
        let json = serde_json::to_string(&fixture).unwrap();
        let source = LocalSource::from_fixture_str(&json).unwrap();
        assert_eq!(source.video_count(), 2);
    }

    #[test]
    fn test_invalid_fixture() {
        assert!(LocalSource::from_fixture_str("{not json").is_err());
    }
}
