//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use grayband::models::{ChannelId, ChannelInfo, VideoId};
use grayband::youtube::{LocalSource, VideoDetails};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const CHANNEL_ID: &str = "UCintegrationchannel00ab";
pub const UPLOADS_ID: &str = "UUintegrationchannel00ab";
pub const HANDLE: &str = "integration";

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs: `Some(v)` sets, `None` removes.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Fixed reference instant for video ages.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 8, 30, 0).unwrap()
}

pub fn channel_info() -> ChannelInfo {
    ChannelInfo {
        channel_id: ChannelId::new(CHANNEL_ID),
        channel_name: "Integration Channel".to_string(),
        subscriber_count: Some(12_345),
        total_view_count: 9_876_543,
        total_video_count: 64,
        uploads_playlist_id: UPLOADS_ID.to_string(),
    }
}

/// Video `n` published `age_days` before [`now`].
pub fn video(n: usize, age_days: i64, duration: &str, views: u64) -> VideoDetails {
    video_at(now(), n, age_days, duration, views)
}

/// Video `n` published `age_days` before `reference`.
pub fn video_at(
    reference: DateTime<Utc>,
    n: usize,
    age_days: i64,
    duration: &str,
    views: u64,
) -> VideoDetails {
    VideoDetails {
        video_id: VideoId::new(format!("int{:08}", n)),
        title: format!("Integration video {}", n),
        published_at: reference - Duration::days(age_days),
        duration_token: duration.to_string(),
        view_count: views,
        like_count: Some(views / 40),
        comment_count: Some(views / 400),
        thumbnail_url: None,
    }
}

/// Local source with the integration channel (also reachable as `@integration`).
pub fn source_with(videos: Vec<VideoDetails>) -> LocalSource {
    let source = LocalSource::new();
    source.add_channel(channel_info(), Some(HANDLE));
    for v in videos {
        source.add_video(UPLOADS_ID, v);
    }
    source
}

/// A 5-day-old long-form target plus `references` long-form videos aged
/// 10 days and up.
pub fn long_form_source(references: usize) -> LocalSource {
    let mut videos = vec![video(0, 5, "PT14M2S", 25_000)];
    videos.extend((1..=references).map(|n| video(n, 9 + n as i64, "PT10M", 8_000 + 900 * n as u64)));
    source_with(videos)
}

/// Target + 3 shorts + 47 long-form references.
pub fn mostly_long_form_source() -> LocalSource {
    let mut videos = vec![video(0, 4, "PT7M", 6_000)];
    videos.extend((1..=3).map(|n| video(n, 10 + n as i64, "PT59S", 80_000)));
    videos.extend((4..=50).map(|n| video(n, 10 + n as i64, "PT1H2M", 15_000)));
    source_with(videos)
}

/// Like [`long_form_source`] but aged against the wall clock, for code paths
/// that read the current time themselves.
pub fn live_long_form_source(references: usize) -> LocalSource {
    let reference = Utc::now();
    let mut videos = vec![video_at(reference, 0, 5, "PT14M2S", 25_000)];
    videos.extend(
        (1..=references).map(|n| video_at(reference, n, 9 + n as i64, "PT10M", 8_000 + 900 * n as u64)),
    );
    source_with(videos)
}
