//! Shared fixtures for service tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::analysis::{run_analysis, AnalysisReport, AnalysisRequest};
use crate::config::AnalysisSettings;
use crate::models::VideoId;
use crate::youtube::local::{fixture_channel, LocalSource};
use crate::youtube::VideoDetails;

pub(crate) const CHANNEL: &str = "UCfixturechannel000000ab";

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A 4-day-old target followed by twelve long-form references aged 10..=21 days.
pub(crate) fn sample_source() -> LocalSource {
    let source = LocalSource::new();
    let channel = fixture_channel(CHANNEL);
    let playlist = channel.uploads_playlist_id.clone();
    source.add_channel(channel, Some("fixture"));

    let video = |n: usize, age: i64, views: u64| VideoDetails {
        video_id: VideoId::new(format!("fix{:08}", n)),
        title: format!("Fixture video {}", n),
        published_at: now() - Duration::days(age),
        duration_token: "PT11M".to_string(),
        view_count: views,
        like_count: Some(views / 50),
        comment_count: None,
        thumbnail_url: None,
    };

    source.add_video(&playlist, video(0, 4, 9_000));
    for n in 1..=12 {
        source.add_video(&playlist, video(n, 9 + n as i64, 5_000 + 1_500 * n as u64));
    }
    source
}

/// Seeded report over [`sample_source`] with a 10-day horizon.
pub(crate) async fn sample_report() -> AnalysisReport {
    let request = AnalysisRequest {
        horizon_days: Some(10),
        seed: Some(7),
        ..AnalysisRequest::new(CHANNEL)
    };
    run_analysis(&sample_source(), &request, &AnalysisSettings::default(), 50, now())
        .await
        .expect("fixture analysis succeeds")
}
