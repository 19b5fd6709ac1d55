//! Chart payload for the gray band view.
//!
//! The frontend draws four layers: the band area between the lower and upper
//! edges, the median line, the target's observed curve and its projection.
//! Colors come from an explicit [`Theme`]; nothing here reads global state.

use serde::{Deserialize, Serialize};

use super::analysis::AnalysisReport;
use crate::models::RankColor;

/// Colors used by the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_band_fill")]
    pub band_fill: String,
    #[serde(default = "default_median_line")]
    pub median_line: String,
    #[serde(default = "default_actual_line")]
    pub actual_line: String,
    #[serde(default = "default_projected_line")]
    pub projected_line: String,
}

fn default_band_fill() -> String {
    "rgba(128,128,128,0.3)".to_string()
}

fn default_median_line() -> String {
    "#555555".to_string()
}

fn default_actual_line() -> String {
    "#d62728".to_string()
}

fn default_projected_line() -> String {
    "#ff7f0e".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            band_fill: default_band_fill(),
            median_line: default_median_line(),
            actual_line: default_actual_line(),
            projected_line: default_projected_line(),
        }
    }
}

/// One `(day, value)` sample of a line series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub day: u32,
    pub value: f64,
}

/// Lower and upper band edges on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandAreaPoint {
    pub day: u32,
    pub lower: f64,
    pub upper: f64,
}

/// A named, colored line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub dashed: bool,
    pub points: Vec<SeriesPoint>,
}

/// Everything the frontend needs to draw the benchmark chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub band_label: String,
    pub band_fill: String,
    pub band: Vec<BandAreaPoint>,
    pub median: LineSeries,
    pub actual: LineSeries,
    pub projected: LineSeries,
    pub rank_label: String,
    pub rank_color: RankColor,
    pub x_max: u32,
    pub y_max: f64,
}

/// Build the chart payload for `report` styled with `theme`.
///
/// The projected series starts at the last observed point so the two lines
/// join without a gap.
pub fn build_chart(report: &AnalysisReport, theme: &Theme) -> ChartData {
    let band: Vec<BandAreaPoint> = report
        .band
        .iter()
        .map(|row| BandAreaPoint {
            day: row.day,
            lower: row.lower_band,
            upper: row.upper_band,
        })
        .collect();

    let median_points = report
        .band
        .iter()
        .map(|row| SeriesPoint {
            day: row.day,
            value: row.median,
        })
        .collect();

    let to_point = |p: &crate::models::ProjectedPoint| SeriesPoint {
        day: p.day,
        value: p.cumulative_views,
    };
    let actual_points: Vec<SeriesPoint> = report
        .projection
        .iter()
        .filter(|p| !p.is_projected)
        .map(to_point)
        .collect();
    let mut projected_points: Vec<SeriesPoint> = actual_points.last().copied().into_iter().collect();
    projected_points.extend(report.projection.iter().filter(|p| p.is_projected).map(to_point));
    if projected_points.len() < 2 {
        projected_points.clear();
    }

    let x_max = report
        .band
        .last()
        .map(|row| row.day)
        .into_iter()
        .chain(report.projection.last().map(|p| p.day))
        .max()
        .unwrap_or(0);
    let y_max = band
        .iter()
        .map(|p| p.upper)
        .chain(report.projection.iter().map(|p| p.cumulative_views))
        .fold(0.0_f64, f64::max);

    ChartData {
        title: format!("{} vs. {}", report.target.title, report.channel.channel_name),
        band_label: format!("Typical performance ({:.0}% band)", report.band_width.percent()),
        band_fill: theme.band_fill.clone(),
        band,
        median: LineSeries {
            name: "Median".to_string(),
            color: theme.median_line.clone(),
            dashed: false,
            points: median_points,
        },
        actual: LineSeries {
            name: "This video".to_string(),
            color: theme.actual_line.clone(),
            dashed: false,
            points: actual_points,
        },
        projected: LineSeries {
            name: "Projected".to_string(),
            color: theme.projected_line.clone(),
            dashed: true,
            points: projected_points,
        },
        rank_label: report.comparison.rank_label.clone(),
        rank_color: report.comparison.rank_color,
        x_max,
        y_max,
    }
}
