use super::*;
use crate::youtube::local::{fixture_channel, LocalSource};
use crate::youtube::VideoDetails;
use chrono::{Duration, TimeZone};

const CHANNEL: &str = "UCabcdefghijklmnopqrstuv";
const UPLOADS: &str = "UUabcdefghijklmnopqrstuv";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn video(n: usize, age_days: i64, duration: &str, views: u64) -> VideoDetails {
    VideoDetails {
        video_id: VideoId::new(format!("vid{:08}", n)),
        title: format!("Video {}", n),
        published_at: now() - Duration::days(age_days),
        duration_token: duration.to_string(),
        view_count: views,
        like_count: None,
        comment_count: None,
        thumbnail_url: None,
    }
}

/// Channel whose uploads are `videos`; the handle `@creator` also resolves.
fn source_with(videos: Vec<VideoDetails>) -> LocalSource {
    let source = LocalSource::new();
    source.add_channel(fixture_channel(CHANNEL), Some("creator"));
    for v in videos {
        source.add_video(UPLOADS, v);
    }
    source
}

/// Newest first: video 0 is 1 day old, video n is n + 1 days old.
fn long_form_channel(count: usize) -> LocalSource {
    source_with(
        (0..count)
            .map(|n| video(n, n as i64 + 1, "PT12M", 10_000 + 1_000 * n as u64))
            .collect(),
    )
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        seed: Some(42),
        ..AnalysisRequest::new(CHANNEL)
    }
}

async fn run(source: &LocalSource, request: &AnalysisRequest) -> AnalysisResult<AnalysisReport> {
    run_analysis(source, request, &AnalysisSettings::default(), 50, now()).await
}

#[tokio::test]
async fn test_default_target_is_most_recent_upload() {
    let source = long_form_channel(20);
    let report = run(&source, &request()).await.unwrap();

    assert_eq!(report.target.video_id, VideoId::new("vid00000000"));
    assert!(!report.reference_ids.contains(&report.target.video_id));
    // Ten references fetched; video 1 is only 2 days old.
    assert_eq!(report.reference_ids.len(), 9);
    assert_eq!(report.trajectories.len(), 9);
    assert_eq!(report.applied_filter, VideoFilter::All);
    assert_eq!(report.comparison.video_id, report.target.video_id);
}

#[tokio::test]
async fn test_resolves_handles_and_urls() {
    let source = long_form_channel(12);
    for channel in ["@creator", "https://www.youtube.com/@creator/videos"] {
        let report = run(&source, &AnalysisRequest::new(channel)).await.unwrap();
        assert_eq!(report.channel.channel_id.as_str(), CHANNEL);
    }
}

#[tokio::test]
async fn test_trajectory_length_is_min_of_age_and_horizon() {
    let source = long_form_channel(12);
    let report = run(
        &source,
        &AnalysisRequest {
            horizon_days: Some(5),
            ..request()
        },
    )
    .await
    .unwrap();

    for trajectory in &report.trajectories {
        assert!(trajectory.len() <= 5);
    }
    // Video 1 is 2 days old and excluded; video 2 is 3 days old.
    let youngest = report
        .trajectories
        .iter()
        .find(|t| t.video_id == VideoId::new("vid00000002"))
        .unwrap();
    assert_eq!(youngest.len(), 3);
    assert!(report.band.len() <= 5);
}

#[tokio::test]
async fn test_young_videos_are_excluded_with_warning() {
    let source = long_form_channel(12);
    let report = run(&source, &request()).await.unwrap();

    assert!(!report.reference_ids.contains(&VideoId::new("vid00000001")));
    assert!(report.warnings.iter().any(|w| w.contains("younger than 3 days")));
}

#[tokio::test]
async fn test_shorts_filter_falls_back_when_too_few_match() {
    // Target + 3 shorts + 47 long-form references.
    let mut videos = vec![video(0, 1, "PT10M", 5_000)];
    videos.extend((1..=3).map(|n| video(n, 10 + n as i64, "PT45S", 50_000)));
    videos.extend((4..=50).map(|n| video(n, 10 + n as i64, "PT8M30S", 20_000)));
    let source = source_with(videos);

    let report = run(
        &source,
        &AnalysisRequest {
            max_videos: Some(50),
            filter: VideoFilter::ShortsOnly,
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.requested_filter, VideoFilter::ShortsOnly);
    assert_eq!(report.applied_filter, VideoFilter::All);
    assert_eq!(report.reference_ids.len(), 50);
    assert!(report.warnings.iter().any(|w| w.contains("shorts_only")));
}

#[tokio::test]
async fn test_shorts_filter_applies_when_enough_match() {
    let mut videos = vec![video(0, 1, "PT10M", 5_000)];
    videos.extend((1..=6).map(|n| video(n, 10 + n as i64, "PT30S", 50_000)));
    videos.extend((7..=12).map(|n| video(n, 10 + n as i64, "PT20M", 20_000)));
    let source = source_with(videos);

    let report = run(
        &source,
        &AnalysisRequest {
            max_videos: Some(20),
            filter: VideoFilter::ShortsOnly,
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.applied_filter, VideoFilter::ShortsOnly);
    assert_eq!(report.reference_ids.len(), 6);
    assert!(report
        .trajectories
        .iter()
        .all(|t| t.shape == crate::models::ShapeClass::Short));
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn test_empty_benchmark_when_all_references_too_young() {
    let source = source_with((0..6).map(|n| video(n, 1, "PT5M", 100)).collect());
    let err = run(&source, &request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyBenchmark { .. }));
    assert!(!err.is_resolution());
}

#[tokio::test]
async fn test_empty_channel_is_empty_benchmark() {
    let source = source_with(Vec::new());
    assert!(matches!(
        run(&source, &request()).await,
        Err(AnalysisError::EmptyBenchmark { .. })
    ));
}

#[tokio::test]
async fn test_requested_target_outside_uploads() {
    let source = long_form_channel(12);
    source.add_unlisted_video(video(99, 7, "PT3M", 77_000));

    let report = run(
        &source,
        &AnalysisRequest {
            target_video: Some("https://youtu.be/vid00000099".to_string()),
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.target.video_id, VideoId::new("vid00000099"));
    assert_eq!(report.comparison.age_days, 7);
    assert_eq!(report.comparison.current_views, 77_000);
    // The two newest uploads become references but are too young to count.
    assert_eq!(report.reference_ids.len(), 8);
}

#[tokio::test]
async fn test_requested_target_among_uploads_is_not_a_reference() {
    let source = long_form_channel(12);
    let report = run(
        &source,
        &AnalysisRequest {
            target_video: Some("vid00000005".to_string()),
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.target.video_id, VideoId::new("vid00000005"));
    assert!(!report.reference_ids.contains(&VideoId::new("vid00000005")));
}

#[tokio::test]
async fn test_resolution_errors() {
    let source = long_form_channel(12);

    let err = run(&source, &AnalysisRequest::new("not a channel")).await.unwrap_err();
    assert!(matches!(err, AnalysisError::UnrecognizedReference(_)));

    let err = run(&source, &AnalysisRequest::new("@nobody")).await.unwrap_err();
    assert!(matches!(err, AnalysisError::ChannelNotFound(_)));

    let err = run(
        &source,
        &AnalysisRequest {
            target_video: Some("zzzzzzzzzzz".to_string()),
            ..request()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AnalysisError::VideoNotFound(_)));
    assert!(err.is_resolution());
}

#[tokio::test]
async fn test_invalid_arguments() {
    let source = long_form_channel(12);
    for bad in [
        AnalysisRequest {
            max_videos: Some(4),
            ..request()
        },
        AnalysisRequest {
            max_videos: Some(51),
            ..request()
        },
        AnalysisRequest {
            horizon_days: Some(0),
            ..request()
        },
    ] {
        assert!(matches!(
            run(&source, &bad).await,
            Err(AnalysisError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn test_source_failure_is_not_resolution() {
    let source = long_form_channel(12);
    source.set_healthy(false);
    let err = run(&source, &request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Source(_)));
    assert!(!err.is_resolution());
}

#[tokio::test]
async fn test_seed_makes_runs_reproducible() {
    let source = long_form_channel(15);
    let first = run(&source, &request()).await.unwrap();
    let second = run(&source, &request()).await.unwrap();
    assert_eq!(first.band, second.band);
    assert_eq!(first.projection, second.projection);
}

#[tokio::test]
async fn test_comparison_without_band_row_is_insufficient() {
    // Target far older than the horizon while the band stops at day 16.
    let mut videos: Vec<VideoDetails> = (0..8)
        .map(|n| video(n, 10 + n as i64, "PT9M", 40_000))
        .collect();
    videos.push(video(50, 400, "PT9M", 1_000_000));
    let source = source_with(videos);

    let report = run(
        &source,
        &AnalysisRequest {
            target_video: Some("vid00000050".to_string()),
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.comparison.rank, crate::models::Rank::InsufficientData);
    assert!(report.comparison.band_row.is_none());
    assert!(report.warnings.iter().any(|w| w.contains("day 29")));
}

#[tokio::test]
async fn test_target_as_old_as_its_references_is_ranked() {
    let videos: Vec<VideoDetails> = (0..9)
        .map(|n| video(n, 10, "PT9M", 20_000 + 1_000 * n as u64))
        .collect();
    let source = source_with(videos);

    let report = run(
        &source,
        &AnalysisRequest {
            target_video: Some("vid00000008".to_string()),
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.reference_ids.len(), 8);
    assert_eq!(report.band.last().unwrap().day, 9);
    assert_eq!(report.comparison.age_days, 10);
    assert_eq!(report.comparison.benchmark_day, 9);
    assert!(report.comparison.band_row.is_some());
    assert_ne!(report.comparison.rank, crate::models::Rank::InsufficientData);
    assert!(report.warnings.is_empty());

    let last_observed = report.projection.iter().filter(|p| !p.is_projected).last().unwrap();
    assert_eq!(last_observed.day, 9);
    assert_eq!(last_observed.cumulative_views, 28_000.0);
}

#[tokio::test]
async fn test_target_at_horizon_uses_last_band_day() {
    let mut videos: Vec<VideoDetails> = (0..10)
        .map(|n| video(n, 41 + n as i64, "PT9M", 60_000))
        .collect();
    videos.push(video(90, 30, "PT9M", 45_000));
    let source = source_with(videos);

    let report = run(
        &source,
        &AnalysisRequest {
            target_video: Some("vid00000090".to_string()),
            ..request()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.band.len(), 30);
    assert_eq!(report.comparison.benchmark_day, 29);
    assert_eq!(report.comparison.band_row.unwrap().day, 29);
    assert_ne!(report.comparison.rank, crate::models::Rank::InsufficientData);
    // Every reference ends at 60_000 on day 29.
    assert_eq!(report.comparison.performance_ratio, Some(0.75));
}

#[test]
fn test_apply_filter_all_is_untouched() {
    let videos = vec![video(0, 5, "PT10S", 1).into_meta()];
    let (kept, applied, warning) = apply_filter(videos, VideoFilter::All, 5);
    assert_eq!(kept.len(), 1);
    assert_eq!(applied, VideoFilter::All);
    assert!(warning.is_none());
}

#[test]
fn test_unparseable_duration_counts_as_long_form() {
    let videos: Vec<VideoMeta> = (0..5)
        .map(|n| video(n, 5, "garbage", 1).into_meta())
        .collect();
    let (kept, applied, _) = apply_filter(videos, VideoFilter::LongFormOnly, 5);
    assert_eq!(kept.len(), 5);
    assert_eq!(applied, VideoFilter::LongFormOnly);
}
