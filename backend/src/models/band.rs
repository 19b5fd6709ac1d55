use serde::{Deserialize, Serialize};

/// Width of the typical-performance band, in percent of the distribution.
///
/// Uses the full-width convention: `50` covers the middle 50% of reference
/// videos (25th to 75th percentile), `80` the middle 80% (10th to 90th).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct BandWidth(f64);

impl BandWidth {
    pub const DEFAULT: BandWidth = BandWidth(50.0);

    /// Create a band width; must lie in `(0, 100]`.
    pub fn new(percent: f64) -> Result<Self, String> {
        if percent.is_finite() && percent > 0.0 && percent <= 100.0 {
            Ok(Self(percent))
        } else {
            Err(format!(
                "Band width must be in (0, 100], got {}",
                percent
            ))
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// Quantile of the lower band edge, in `[0, 0.5)`.
    pub fn lower_quantile(&self) -> f64 {
        (100.0 - self.0) / 200.0
    }

    /// Quantile of the upper band edge, in `(0.5, 1]`.
    pub fn upper_quantile(&self) -> f64 {
        1.0 - self.lower_quantile()
    }

    /// Percentage reported by the "Top N%" / "Bottom N%" rank labels.
    pub fn outside_percent(&self) -> f64 {
        100.0 - self.0
    }
}

impl Default for BandWidth {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for BandWidth {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BandWidth> for f64 {
    fn from(value: BandWidth) -> Self {
        value.0
    }
}

/// Aggregated benchmark values for one day since publish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub day: u32,
    pub lower_band: f64,
    pub upper_band: f64,
    pub median: f64,
    pub mean: f64,
    pub sample_count: usize,
}

impl BandRow {
    pub fn width(&self) -> f64 {
        self.upper_band - self.lower_band
    }
}

/// Find the row for `day` in a band ordered by day.
pub fn band_row_at(band: &[BandRow], day: u32) -> Option<&BandRow> {
    band.binary_search_by_key(&day, |row| row.day)
        .ok()
        .map(|idx| &band[idx])
}
