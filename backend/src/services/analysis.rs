//! End-to-end benchmark run for one channel and one target video.
//!
//! Resolves the channel, pages through its uploads, picks the target, builds
//! the reference set, then synthesizes trajectories and compares the target
//! against the resulting band.

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::benchmark::aggregate_band;
use super::comparator::compare;
use super::error::{AnalysisError, AnalysisResult};
use super::projection::project;
use super::trajectory::{current_day, curve_days, generate_for_video};
use crate::config::AnalysisSettings;
use crate::models::{
    band_row_at, BandRow, BandWidth, ChannelInfo, ComparisonResult, ProjectedPoint,
    ProjectionMode, Trajectory, VideoFilter, VideoId, VideoMeta,
};
use crate::youtube::{
    collect_uploads, fetch_video_metas, parse_channel_ref, parse_video_ref, SourceError,
    VideoSource,
};

/// Accepted range for the number of reference videos.
pub const MAX_VIDEOS_RANGE: std::ops::RangeInclusive<usize> = 5..=50;

/// Parameters of one analysis run. Unset fields take the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Channel id, `@handle` or channel URL.
    pub channel: String,
    /// Video id or URL; defaults to the most recent upload.
    #[serde(default)]
    pub target_video: Option<String>,
    #[serde(default)]
    pub max_videos: Option<usize>,
    #[serde(default)]
    pub filter: VideoFilter,
    #[serde(default)]
    pub band_width: Option<BandWidth>,
    #[serde(default)]
    pub horizon_days: Option<u32>,
    #[serde(default)]
    pub projection: ProjectionMode,
    /// Fixes the random generator for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AnalysisRequest {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub channel: ChannelInfo,
    pub target: VideoMeta,
    pub reference_ids: Vec<VideoId>,
    pub requested_filter: VideoFilter,
    /// Filter actually used; `All` after a fallback.
    pub applied_filter: VideoFilter,
    pub band_width: BandWidth,
    pub horizon_days: u32,
    pub warnings: Vec<String>,
    pub band: Vec<BandRow>,
    pub comparison: ComparisonResult,
    pub projection: Vec<ProjectedPoint>,
    pub trajectories: Vec<Trajectory>,
    pub generated_at: DateTime<Utc>,
}

/// Request fields merged with the configured defaults and validated.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    max_videos: usize,
    band_width: BandWidth,
    horizon_days: u32,
}

fn resolve_parameters(request: &AnalysisRequest, settings: &AnalysisSettings) -> AnalysisResult<Resolved> {
    let max_videos = request.max_videos.unwrap_or(settings.max_videos);
    if !MAX_VIDEOS_RANGE.contains(&max_videos) {
        return Err(AnalysisError::invalid_argument(format!(
            "max_videos must be within {}..={}, got {}",
            MAX_VIDEOS_RANGE.start(),
            MAX_VIDEOS_RANGE.end(),
            max_videos
        )));
    }

    let horizon_days = request.horizon_days.unwrap_or(settings.horizon_days);
    if horizon_days == 0 {
        return Err(AnalysisError::invalid_argument("horizon_days must be positive"));
    }

    Ok(Resolved {
        max_videos,
        band_width: request.band_width.unwrap_or(settings.band_width),
        horizon_days,
    })
}

/// Apply the type filter, falling back to the whole set when too few match.
///
/// Returns the selected videos, the filter actually applied and an optional
/// warning describing the fallback.
pub fn apply_filter(
    videos: Vec<VideoMeta>,
    filter: VideoFilter,
    min_matching: usize,
) -> (Vec<VideoMeta>, VideoFilter, Option<String>) {
    if filter == VideoFilter::All {
        return (videos, filter, None);
    }

    let matching = videos.iter().filter(|v| filter.matches(v)).count();
    if matching >= min_matching {
        let selected = videos.into_iter().filter(|v| filter.matches(v)).collect();
        return (selected, filter, None);
    }

    let warning = format!(
        "Only {} of {} reference videos match filter '{}' (need {}); using all videos",
        matching,
        videos.len(),
        filter,
        min_matching
    );
    warn!(%filter, matching, total = videos.len(), "Filter fallback to all videos");
    (videos, VideoFilter::All, Some(warning))
}

/// Run the whole pipeline against `source`.
///
/// # Arguments
/// * `source` - Channel, upload list and detail provider
/// * `request` - What to analyse
/// * `settings` - Defaults and thresholds
/// * `page_size` - Upload page size requested from the source
/// * `now` - Reference instant for video ages
///
/// # Errors
/// * Resolution errors when the channel or target cannot be parsed or found
/// * `InvalidArgument` for out-of-range parameters
/// * `EmptyBenchmark` when no reference video survives filtering
/// * `Source` for any other source failure
pub async fn run_analysis<S: VideoSource + ?Sized>(
    source: &S,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
    page_size: usize,
    now: DateTime<Utc>,
) -> AnalysisResult<AnalysisReport> {
    let params = resolve_parameters(request, settings)?;

    let channel_ref = parse_channel_ref(&request.channel)
        .ok_or_else(|| AnalysisError::UnrecognizedReference(request.channel.clone()))?;
    let target_ref = match &request.target_video {
        Some(input) => Some(
            parse_video_ref(input).ok_or_else(|| AnalysisError::UnrecognizedReference(input.clone()))?,
        ),
        None => None,
    };

    let channel = source
        .resolve_channel(&channel_ref)
        .await
        .map_err(|e| match e {
            SourceError::NotFound { .. } => AnalysisError::ChannelNotFound(channel_ref.to_string()),
            other => other.into(),
        })?;
    info!(
        channel_id = %channel.channel_id,
        channel_name = %channel.channel_name,
        "Resolved channel"
    );

    // One extra upload so the default target can be dropped from the references.
    let uploads = collect_uploads(
        source,
        &channel.uploads_playlist_id,
        params.max_videos + 1,
        page_size,
    )
    .await?;
    let ids: Vec<VideoId> = uploads.into_iter().map(|u| u.video_id).collect();
    let mut videos = fetch_video_metas(source, &ids).await?;
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    info!(uploads = ids.len(), with_details = videos.len(), "Fetched channel uploads");

    let target = match target_ref {
        Some(id) => match videos.iter().position(|v| v.video_id == id) {
            Some(pos) => videos.remove(pos),
            None => fetch_video_metas(source, std::slice::from_ref(&id))
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| AnalysisError::VideoNotFound(id.to_string()))?,
        },
        None => {
            if videos.is_empty() {
                return Err(AnalysisError::EmptyBenchmark {
                    channel: channel.channel_id.to_string(),
                    details: "channel has no uploads".to_string(),
                });
            }
            videos.remove(0)
        }
    };
    videos.truncate(params.max_videos);

    let mut warnings = Vec::new();
    let (references, applied_filter, fallback) =
        apply_filter(videos, request.filter, settings.min_reference_videos);
    warnings.extend(fallback);

    let (references, too_young): (Vec<VideoMeta>, Vec<VideoMeta>) = references
        .into_iter()
        .partition(|v| v.age_days(now) >= settings.min_age_days);
    if !too_young.is_empty() {
        warnings.push(format!(
            "Excluded {} video(s) younger than {} days",
            too_young.len(),
            settings.min_age_days
        ));
    }
    if references.is_empty() {
        return Err(AnalysisError::EmptyBenchmark {
            channel: channel.channel_id.to_string(),
            details: format!(
                "no reference video is at least {} days old after filter '{}'",
                settings.min_age_days, applied_filter
            ),
        });
    }

    let mut rng = match request.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let trajectories = references
        .iter()
        .map(|video| {
            let days = curve_days(video.age_days(now), params.horizon_days);
            generate_for_video(video, days, &mut rng)
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    let band = aggregate_band(&trajectories, params.band_width);
    info!(
        references = trajectories.len(),
        band_days = band.len(),
        band_width = params.band_width.percent(),
        "Built benchmark band"
    );

    // The target's views sit on the same day index as the last point of a
    // reference curve of the same age.
    let target_age = target.age_days(now);
    let benchmark_day = current_day(target_age, params.horizon_days);
    let band_row = band_row_at(&band, benchmark_day).copied();
    if band_row.is_none() {
        warnings.push(format!(
            "No benchmark data at day {} for the target video",
            benchmark_day
        ));
    }
    let comparison = ComparisonResult::new(
        target.video_id.clone(),
        target_age,
        benchmark_day,
        target.view_count,
        band_row,
        compare(target.view_count, band_row.as_ref(), params.band_width),
    );
    let projection = project(
        &target,
        &band,
        params.horizon_days,
        request.projection,
        now,
        &mut rng,
    );
    info!(
        target = %target.video_id,
        rank = %comparison.rank_label,
        "Analysis complete"
    );

    Ok(AnalysisReport {
        channel,
        reference_ids: references.iter().map(|v| v.video_id.clone()).collect(),
        target,
        requested_filter: request.filter,
        applied_filter,
        band_width: params.band_width,
        horizon_days: params.horizon_days,
        warnings,
        band,
        comparison,
        projection,
        trajectories,
        generated_at: now,
    })
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
