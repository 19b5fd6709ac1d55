use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::video::{ShapeClass, VideoId};

/// One day of a cumulative-view curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Days since publish (day 0 is the publish day).
    pub day: u32,
    pub daily_views: u64,
    pub cumulative_views: u64,
}

/// Synthetic daily curve of a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub video_id: VideoId,
    pub shape: ShapeClass,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_views(&self) -> Option<u64> {
        self.points.last().map(|p| p.cumulative_views)
    }
}

/// Point of a target video's reconstructed or projected curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub day: u32,
    pub daily_views: f64,
    pub cumulative_views: f64,
    /// `true` for days past the video's current age.
    pub is_projected: bool,
}

/// How far the projection simulator extends the target's curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Only reconstruct days up to the video's current age.
    ObservedOnly,
    /// Continue along the benchmark up to the analysis horizon.
    #[default]
    FullProjection,
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "observed" | "observed_only" => Ok(Self::ObservedOnly),
            "full" | "full_projection" => Ok(Self::FullProjection),
            _ => Err(format!("Unknown projection mode: {}", s)),
        }
    }
}
