//! Benchmark engine and its orchestration.
//!
//! The pure stages ([`trajectory`], [`benchmark`], [`comparator`],
//! [`projection`]) know nothing about video sources; [`analysis`] wires them
//! to a [`VideoSource`](crate::youtube::VideoSource) and [`export`] /
//! [`chart`] render the result.

pub mod analysis;
pub mod benchmark;
pub mod chart;
pub mod comparator;
pub mod error;
pub mod export;
pub mod projection;
pub mod trajectory;

#[cfg(test)]
pub(crate) mod fixtures;

pub use analysis::{apply_filter, run_analysis, AnalysisReport, AnalysisRequest};
pub use benchmark::{aggregate_band, quantile};
pub use chart::{build_chart, ChartData, Theme};
pub use comparator::compare;
pub use error::{AnalysisError, AnalysisResult};
pub use export::{band_csv, projection_csv, trajectories_csv, ExportError};
pub use projection::{performance_ratio, project};
pub use trajectory::{current_day, curve_days, generate_for_video, generate_trajectory};
