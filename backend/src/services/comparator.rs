//! Rank a video's current views against the band at its age.

use crate::models::{BandRow, BandWidth, Comparison, Rank};

/// Compare `current_views` with the band row at the video's current age.
///
/// Rules, first match wins:
/// 1. no row, no samples, or a non-positive median: `InsufficientData`
/// 2. at or above the upper edge: `Top`
/// 3. at or below the lower edge: `Bottom`
/// 4. otherwise the percentile is interpolated between the two edges
pub fn compare(current_views: u64, band_row: Option<&BandRow>, band_width: BandWidth) -> Comparison {
    let Some(row) = band_row.filter(|r| r.sample_count > 0 && r.median > 0.0) else {
        return Comparison {
            performance_ratio: None,
            vs_median_percent: None,
            rank: Rank::InsufficientData,
        };
    };

    let current = current_views as f64;
    let ratio = current / row.median;

    let rank = if current >= row.upper_band {
        Rank::Top {
            percent: band_width.outside_percent(),
        }
    } else if current <= row.lower_band {
        Rank::Bottom {
            percent: band_width.outside_percent(),
        }
    } else {
        // lower < current < upper, so the width is positive here.
        let position = (current - row.lower_band) / row.width();
        let lower_percentile = 100.0 * band_width.lower_quantile();
        let upper_percentile = 100.0 * band_width.upper_quantile();
        Rank::Within {
            percentile: lower_percentile + position * (upper_percentile - lower_percentile),
        }
    };

    Comparison {
        performance_ratio: Some(ratio),
        vs_median_percent: Some((ratio - 1.0) * 100.0),
        rank,
    }
}
