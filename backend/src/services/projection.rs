//! Reconstruct and extend a target video's curve along the benchmark.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::trajectory::current_day;
use crate::models::{band_row_at, BandRow, ProjectedPoint, ProjectionMode, VideoMeta};

/// Videos younger than this are treated as this old.
pub const MIN_PROJECTION_AGE_DAYS: u32 = 2;

/// Relative jitter applied to reconstructed (observed) points.
pub const OBSERVED_JITTER: f64 = 0.02;

/// `current_views / median` on band day `day`, or 1.0 without a usable median.
pub fn performance_ratio(current_views: u64, band: &[BandRow], day: u32) -> f64 {
    match band_row_at(band, day) {
        Some(row) if row.median > 0.0 => current_views as f64 / row.median,
        _ => 1.0,
    }
}

/// Build the target's reconstructed past and, in full mode, its projection.
///
/// The observed part follows the band median scaled by the video's
/// performance ratio, with a small uniform jitter for visual texture; its last
/// point, on the last day of a curve as old as the video, is the real current
/// view count. Projected points continue along the scaled median without
/// jitter up to the horizon or the end of the band.
/// An empty band yields no points.
pub fn project<R: Rng + ?Sized>(
    video: &VideoMeta,
    band: &[BandRow],
    horizon_days: u32,
    mode: ProjectionMode,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ProjectedPoint> {
    let Some(last_band_day) = band.last().map(|row| row.day) else {
        return Vec::new();
    };

    let age_days = video.age_days(now).max(MIN_PROJECTION_AGE_DAYS);
    let today = current_day(age_days, horizon_days);
    let ratio = performance_ratio(video.view_count, band, today);

    let mut series: Vec<(u32, f64, bool)> = Vec::new();
    for day in 0..=today.min(last_band_day) {
        if let Some(row) = band_row_at(band, day) {
            let jitter = rng.random_range((1.0 - OBSERVED_JITTER)..=(1.0 + OBSERVED_JITTER));
            series.push((day, row.median * ratio * jitter, false));
        }
    }
    if let Some(last) = series.last_mut() {
        last.1 = video.view_count as f64;
    }

    if mode == ProjectionMode::FullProjection {
        let last_day = last_band_day.min(horizon_days.saturating_sub(1));
        for day in (today + 1)..=last_day {
            if let Some(row) = band_row_at(band, day) {
                series.push((day, row.median * ratio, true));
            }
        }
    }

    let mut previous: Option<f64> = None;
    series
        .into_iter()
        .map(|(day, cumulative, is_projected)| {
            let daily = match previous {
                Some(prev) => (cumulative - prev).max(0.0),
                None => cumulative.max(0.0),
            };
            previous = Some(cumulative);
            ProjectedPoint {
                day,
                daily_views: daily,
                cumulative_views: cumulative,
                is_projected,
            }
        })
        .collect()
}
