use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::duration::DurationParse;
use crate::define_id_type;

define_id_type!(VideoId);
define_id_type!(ChannelId);

/// Channel metadata returned by a channel lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub subscriber_count: Option<u64>,
    pub total_view_count: u64,
    pub total_video_count: u64,
    /// Playlist holding every public upload of the channel.
    pub uploads_playlist_id: String,
}

/// Metadata of a single video, as fetched for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub video_id: VideoId,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub duration: DurationParse,
    pub view_count: u64,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub thumbnail_url: Option<String>,
}

impl VideoMeta {
    pub fn is_short(&self) -> bool {
        self.duration.is_short()
    }

    pub fn shape_class(&self) -> ShapeClass {
        if self.is_short() {
            ShapeClass::Short
        } else {
            ShapeClass::LongForm
        }
    }

    /// Whole days elapsed since publication, never negative.
    pub fn age_days(&self, now: DateTime<Utc>) -> u32 {
        let days = (now - self.published_at).num_days();
        days.clamp(0, u32::MAX as i64) as u32
    }
}

/// Growth-curve family used when synthesizing a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeClass {
    Short,
    LongForm,
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeClass::Short => write!(f, "short"),
            ShapeClass::LongForm => write!(f, "long_form"),
        }
    }
}

/// Video-type filter applied to the reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFilter {
    #[default]
    All,
    ShortsOnly,
    LongFormOnly,
}

impl VideoFilter {
    pub fn matches(&self, video: &VideoMeta) -> bool {
        match self {
            VideoFilter::All => true,
            VideoFilter::ShortsOnly => video.is_short(),
            VideoFilter::LongFormOnly => !video.is_short(),
        }
    }
}

impl FromStr for VideoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "shorts" | "shorts_only" | "short" => Ok(Self::ShortsOnly),
            "long" | "long_form" | "long_form_only" | "longform" => Ok(Self::LongFormOnly),
            _ => Err(format!("Unknown video filter: {}", s)),
        }
    }
}

impl fmt::Display for VideoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoFilter::All => write!(f, "all"),
            VideoFilter::ShortsOnly => write!(f, "shorts_only"),
            VideoFilter::LongFormOnly => write!(f, "long_form_only"),
        }
    }
}
