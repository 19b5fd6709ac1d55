//! Channel and video references parsed from user input.
//!
//! Users paste whatever they have at hand: a bare channel id, an `@handle`,
//! or one of the many youtube.com URL shapes. These parsers turn that into a
//! typed reference the video source knows how to look up.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{ChannelId, VideoId};

static CHANNEL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UC[A-Za-z0-9_-]{22}$").expect("channel id pattern is valid"));

static BARE_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([A-Za-z0-9._-]{3,30})$").expect("handle pattern is valid"));

static CHANNEL_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/(?:channel/(UC[A-Za-z0-9_-]{22})|@([A-Za-z0-9._-]+)|c/([^/?#]+)|user/([^/?#]+))(?:[/?#].*)?$",
    )
    .expect("channel url pattern is valid")
});

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

static WATCH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.|music\.)?youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]{11})(?:[&#].*)?$")
        .expect("watch url pattern is valid")
});

static SHORT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?youtu\.be/([A-Za-z0-9_-]{11})(?:[/?#].*)?$")
        .expect("short link pattern is valid")
});

static PATH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|m\.)?youtube\.com/(?:shorts|embed|live)/([A-Za-z0-9_-]{11})(?:[/?#].*)?$")
        .expect("path url pattern is valid")
});

/// A way of naming a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ChannelRef {
    /// Canonical `UC...` channel id.
    Id(ChannelId),
    /// `@handle`, stored without the leading `@`.
    Handle(String),
    /// Legacy `/c/<name>` custom URL; needs a search lookup.
    CustomUrl(String),
    /// Legacy `/user/<name>` username.
    Username(String),
}

impl FromStr for ChannelRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_channel_ref(s).ok_or_else(|| format!("Not a channel id, handle or URL: {}", s))
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{}", id),
            ChannelRef::Handle(handle) => write!(f, "@{}", handle),
            ChannelRef::CustomUrl(name) => write!(f, "c/{}", name),
            ChannelRef::Username(name) => write!(f, "user/{}", name),
        }
    }
}

/// Parse a channel id, `@handle` or channel URL.
pub fn parse_channel_ref(input: &str) -> Option<ChannelRef> {
    let input = input.trim();

    if CHANNEL_ID.is_match(input) {
        return Some(ChannelRef::Id(ChannelId::new(input)));
    }

    if let Some(caps) = BARE_HANDLE.captures(input) {
        return Some(ChannelRef::Handle(caps[1].to_string()));
    }

    let caps = CHANNEL_URL.captures(input)?;
    if let Some(id) = caps.get(1) {
        Some(ChannelRef::Id(ChannelId::new(id.as_str())))
    } else if let Some(handle) = caps.get(2) {
        Some(ChannelRef::Handle(handle.as_str().to_string()))
    } else if let Some(name) = caps.get(3) {
        Some(ChannelRef::CustomUrl(name.as_str().to_string()))
    } else {
        caps.get(4).map(|name| ChannelRef::Username(name.as_str().to_string()))
    }
}

/// Parse a video id or any of the common video URL forms.
pub fn parse_video_ref(input: &str) -> Option<VideoId> {
    let input = input.trim();

    if VIDEO_ID.is_match(input) {
        return Some(VideoId::new(input));
    }

    [&*WATCH_URL, &*SHORT_LINK, &*PATH_URL]
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId::new(&caps[1]))
}
