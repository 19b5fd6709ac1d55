use serde::{Deserialize, Serialize};

use super::band::BandRow;
use super::video::VideoId;

/// Display color of a rank outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankColor {
    Green,
    Red,
    Orange,
    Gray,
}

/// Where a video's current views fall relative to the band at its age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rank {
    /// At or above the upper band edge.
    Top { percent: f64 },
    /// At or below the lower band edge.
    Bottom { percent: f64 },
    /// Strictly inside the band; percentile is linearly interpolated.
    Within { percentile: f64 },
    /// No usable benchmark at this age (no samples or a zero median).
    InsufficientData,
}

impl Rank {
    pub fn label(&self) -> String {
        match self {
            Rank::Top { percent } => format!("Top {:.0}%", percent),
            Rank::Bottom { percent } => format!("Bottom {:.0}%", percent),
            Rank::Within { percentile } => format!("~{:.0}th percentile", percentile),
            Rank::InsufficientData => "Insufficient data".to_string(),
        }
    }

    pub fn color(&self) -> RankColor {
        match self {
            Rank::Top { .. } => RankColor::Green,
            Rank::Bottom { .. } => RankColor::Red,
            Rank::Within { .. } => RankColor::Orange,
            Rank::InsufficientData => RankColor::Gray,
        }
    }
}

/// Output of comparing one view count against one band row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// `current / median`; absent when the band has no usable median.
    pub performance_ratio: Option<f64>,
    /// `(current / median - 1) * 100`, signed.
    pub vs_median_percent: Option<f64>,
    pub rank: Rank,
}

/// Ranking of the target video against the channel benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub video_id: VideoId,
    pub age_days: u32,
    /// Band day the current views are compared on.
    pub benchmark_day: u32,
    pub current_views: u64,
    pub band_row: Option<BandRow>,
    pub performance_ratio: Option<f64>,
    pub vs_median_percent: Option<f64>,
    pub rank: Rank,
    pub rank_label: String,
    pub rank_color: RankColor,
}

impl ComparisonResult {
    pub fn new(
        video_id: VideoId,
        age_days: u32,
        benchmark_day: u32,
        current_views: u64,
        band_row: Option<BandRow>,
        comparison: Comparison,
    ) -> Self {
        Self {
            video_id,
            age_days,
            benchmark_day,
            current_views,
            band_row,
            performance_ratio: comparison.performance_ratio,
            vs_median_percent: comparison.vs_median_percent,
            rank_label: comparison.rank.label(),
            rank_color: comparison.rank.color(),
            rank: comparison.rank,
        }
    }
}
