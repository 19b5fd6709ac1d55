//! Video source layer.
//!
//! The benchmark engine consumes channel and video metadata through three
//! collaborator traits (see [`source`]). Two implementations exist:
//!
//! - [`YouTubeSource`]: the YouTube Data API v3 over `reqwest`
//!   (feature `youtube-source`)
//! - [`LocalSource`]: in-memory data, optionally loaded from a JSON fixture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Analysis pipeline (services::analysis)      │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  services.rs - pagination, detail batching    │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  source.rs - ChannelResolver / VideoList... │
//! └─────────┬──────────────────────────┬─────────┘
//!           │                          │
//!   YouTubeSource (HTTP)        LocalSource (memory)
//! ```

#[cfg(feature = "youtube-source")]
pub mod client;
pub mod error;
pub mod factory;
pub mod local;
pub mod services;
pub mod source;
pub mod url;

#[cfg(feature = "youtube-source")]
pub use client::YouTubeSource;
pub use error::{ErrorContext, SourceError, SourceResult};
pub use factory::{SourceFactory, SourceType};
pub use local::{FixtureChannel, LocalFixture, LocalSource};
pub use services::{collect_uploads, fetch_video_metas};
pub use source::{
    ChannelResolver, UploadEntry, UploadPage, VideoDetailProvider, VideoDetails,
    VideoListProvider, VideoSource, MAX_DETAIL_BATCH,
};
pub use url::{parse_channel_ref, parse_video_ref, ChannelRef};
