//! CSV export of band, reference trajectories and projection.

use std::io::Write;

use crate::models::{BandRow, ProjectedPoint, Trajectory};

/// CSV export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV output: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write the band table: one row per day with edges, median, mean and count.
pub fn write_band_rows<W: Write>(band: &[BandRow], writer: &mut csv::Writer<W>) -> csv::Result<()> {
    writer.write_record([
        "day",
        "lower_band",
        "median",
        "upper_band",
        "mean",
        "sample_count",
    ])?;

    for row in band {
        writer.write_record([
            row.day.to_string(),
            format!("{:.1}", row.lower_band),
            format!("{:.1}", row.median),
            format!("{:.1}", row.upper_band),
            format!("{:.1}", row.mean),
            row.sample_count.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every reference trajectory in long format.
pub fn write_trajectory_rows<W: Write>(
    trajectories: &[Trajectory],
    writer: &mut csv::Writer<W>,
) -> csv::Result<()> {
    writer.write_record(["video_id", "shape", "day", "daily_views", "cumulative_views"])?;

    for trajectory in trajectories {
        let shape = trajectory.shape.to_string();
        for point in &trajectory.points {
            writer.write_record([
                trajectory.video_id.to_string(),
                shape.clone(),
                point.day.to_string(),
                point.daily_views.to_string(),
                point.cumulative_views.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the target's reconstructed and projected curve.
pub fn write_projection_rows<W: Write>(
    projection: &[ProjectedPoint],
    writer: &mut csv::Writer<W>,
) -> csv::Result<()> {
    writer.write_record(["day", "daily_views", "cumulative_views", "is_projected"])?;

    for point in projection {
        writer.write_record([
            point.day.to_string(),
            format!("{:.1}", point.daily_views),
            format!("{:.1}", point.cumulative_views),
            point.is_projected.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn to_csv_string<F>(write_rows: F) -> Result<String, ExportError>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_rows(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn band_csv(band: &[BandRow]) -> Result<String, ExportError> {
    to_csv_string(|w| write_band_rows(band, w))
}

pub fn trajectories_csv(trajectories: &[Trajectory]) -> Result<String, ExportError> {
    to_csv_string(|w| write_trajectory_rows(trajectories, w))
}

pub fn projection_csv(projection: &[ProjectedPoint]) -> Result<String, ExportError> {
    to_csv_string(|w| write_projection_rows(projection, w))
}
