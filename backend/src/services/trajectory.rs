//! Synthetic daily view curves.
//!
//! The real per-day history of a video needs the OAuth-gated Analytics API,
//! so every reference video gets a plausible curve instead: a parametric
//! growth shape scaled to the video's known total, with Gaussian noise, then
//! repaired so it never decreases and ends exactly at the known total.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::error::{AnalysisError, AnalysisResult};
use crate::models::{ShapeClass, Trajectory, TrajectoryPoint, VideoMeta};

/// Minimum cumulative views on day 0.
pub const START_FLOOR: u64 = 100;

/// Minimum increase between consecutive days.
pub const MIN_DAILY_INCREMENT: u64 = 10;

/// Noise standard deviation as a fraction of the final view count.
pub const NOISE_FRACTION: f64 = 0.05;

/// Length of the curve of a video `age_days` old, capped at the horizon.
pub fn curve_days(age_days: u32, horizon_days: u32) -> u32 {
    age_days.min(horizon_days)
}

/// Day index holding a video's current view count: the last point of its
/// curve. Reference curves and the target are compared on this index.
pub fn current_day(age_days: u32, horizon_days: u32) -> u32 {
    curve_days(age_days, horizon_days).saturating_sub(1)
}

/// Unscaled growth shape at day index `i` of a `days`-long window.
pub fn shape_value(shape: ShapeClass, i: u32, days: u32) -> f64 {
    let x = (i as f64 + 1.0) / days as f64;
    match shape {
        // Fast early saturation.
        ShapeClass::Short => 1.0 - (-5.0 * x.powf(1.5)).exp(),
        // Logistic centered at 35% of the window.
        ShapeClass::LongForm => 1.0 / (1.0 + (-10.0 * (x - 0.35)).exp()),
    }
}

/// Day-0 floor and per-day increment for a curve ending at `final_views`.
///
/// When the total is too small to hold the nominal floors, both shrink by the
/// same factor so the pinned final value stays reachable.
fn monotonic_floors(final_views: u64, days: u32) -> (u64, u64) {
    let budget = START_FLOOR as u128 + MIN_DAILY_INCREMENT as u128 * (days as u128 - 1);
    if final_views as u128 >= budget {
        return (START_FLOOR, MIN_DAILY_INCREMENT);
    }

    let start = final_views as u128 * START_FLOOR as u128 / budget;
    let step = final_views as u128 * MIN_DAILY_INCREMENT as u128 / budget;
    (start as u64, step as u64)
}

/// Generate a `days`-long cumulative curve ending exactly at `final_views`.
///
/// # Errors
/// `InvalidArgument` when `days` is zero.
pub fn generate_trajectory<R: Rng + ?Sized>(
    final_views: u64,
    days: u32,
    shape: ShapeClass,
    rng: &mut R,
) -> AnalysisResult<Vec<TrajectoryPoint>> {
    if days == 0 {
        return Err(AnalysisError::invalid_argument(
            "trajectory length must be at least one day",
        ));
    }

    let raw: Vec<f64> = (0..days).map(|i| shape_value(shape, i, days)).collect();
    let last_raw = raw[raw.len() - 1];
    let scale = if last_raw > 0.0 {
        final_views as f64 / last_raw
    } else {
        1.0
    };

    let noise = Normal::new(0.0, NOISE_FRACTION * final_views as f64)
        .map_err(|e| AnalysisError::invalid_argument(format!("noise distribution: {}", e)))?;
    let (start_floor, step) = monotonic_floors(final_views, days);

    let mut cumulative: Vec<u64> = Vec::with_capacity(raw.len());
    for value in &raw {
        let noisy = value * scale + noise.sample(rng);
        let sampled = if noisy.is_finite() && noisy > 0.0 {
            noisy.round() as u64
        } else {
            0
        };
        let floor = match cumulative.last() {
            Some(prev) => prev.saturating_add(step),
            None => start_floor,
        };
        cumulative.push(sampled.max(floor));
    }

    // Pin to the real total, then pull earlier days down so every step keeps
    // at least the minimum increment.
    let last = cumulative.len() - 1;
    cumulative[last] = final_views;
    for i in (0..last).rev() {
        let cap = cumulative[i + 1].saturating_sub(step);
        if cumulative[i] > cap {
            cumulative[i] = cap;
        }
    }

    let mut previous = 0u64;
    let points = cumulative
        .into_iter()
        .enumerate()
        .map(|(day, total)| {
            let point = TrajectoryPoint {
                day: day as u32,
                daily_views: total - previous,
                cumulative_views: total,
            };
            previous = total;
            point
        })
        .collect();

    Ok(points)
}

/// Generate the trajectory of a reference video over `days` days.
pub fn generate_for_video<R: Rng + ?Sized>(
    video: &VideoMeta,
    days: u32,
    rng: &mut R,
) -> AnalysisResult<Trajectory> {
    let shape = video.shape_class();
    let points = generate_trajectory(video.view_count, days, shape, rng)?;
    Ok(Trajectory {
        video_id: video.video_id.clone(),
        shape,
        points,
    })
}

#[cfg(test)]
#[path = "trajectory_tests.rs"]
mod trajectory_tests;
