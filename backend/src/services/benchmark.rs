//! Percentile band over reference trajectories aligned by days since publish.

use std::collections::BTreeMap;

use crate::models::{BandRow, BandWidth, Trajectory};

/// Linear-interpolation quantile of an ascending slice.
///
/// Uses position `q * (n - 1)` between the two closest ranks, which matches
/// the default percentile method of most numeric libraries.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Compute the band row for one day's observations.
fn band_row(day: u32, mut values: Vec<f64>, band_width: BandWidth) -> Option<BandRow> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let sample_count = values.len();
    let mean = values.iter().sum::<f64>() / sample_count as f64;

    Some(BandRow {
        day,
        lower_band: quantile(&values, band_width.lower_quantile())?,
        upper_band: quantile(&values, band_width.upper_quantile())?,
        median: quantile(&values, 0.5)?,
        mean,
        sample_count,
    })
}

/// Aggregate trajectories into one band row per day present in the input.
///
/// Shorter trajectories simply stop contributing past their last day; days
/// without any observation produce no row. Rows are ordered by day.
pub fn aggregate_band(trajectories: &[Trajectory], band_width: BandWidth) -> Vec<BandRow> {
    let mut by_day: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for trajectory in trajectories {
        for point in &trajectory.points {
            by_day
                .entry(point.day)
                .or_default()
                .push(point.cumulative_views as f64);
        }
    }

    by_day
        .into_iter()
        .filter_map(|(day, values)| band_row(day, values, band_width))
        .collect()
}

#[cfg(test)]
#[path = "benchmark_tests.rs"]
mod benchmark_tests;
