use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Videos at or below this length are treated as shorts.
pub const SHORT_MAX_SECONDS: u64 = 120;

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("ISO-8601 duration pattern is valid")
});

/// Outcome of parsing an ISO-8601 duration token such as `PT4M13S`.
///
/// A token that matches none of the day/hour/minute/second components is
/// reported as `Unparseable` rather than as a zero-length video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum DurationParse {
    Parsed(u64),
    Unparseable,
}

impl DurationParse {
    /// Parse a duration token as emitted by the YouTube Data API
    /// (`contentDetails.duration`).
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let Some(caps) = ISO_DURATION.captures(token) else {
            return Self::Unparseable;
        };

        // `P` and `PT` alone match the pattern but carry no component.
        if (1..=4).all(|i| caps.get(i).is_none()) {
            return Self::Unparseable;
        }

        let component = |i: usize| -> Option<u64> {
            match caps.get(i) {
                Some(m) => m.as_str().parse::<u64>().ok(),
                None => Some(0),
            }
        };

        let (Some(days), Some(hours), Some(minutes), Some(seconds)) =
            (component(1), component(2), component(3), component(4))
        else {
            return Self::Unparseable;
        };

        days.checked_mul(86_400)
            .and_then(|d| hours.checked_mul(3_600).and_then(|h| d.checked_add(h)))
            .and_then(|t| minutes.checked_mul(60).and_then(|m| t.checked_add(m)))
            .and_then(|t| t.checked_add(seconds))
            .map(Self::Parsed)
            .unwrap_or(Self::Unparseable)
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            Self::Parsed(s) => Some(*s),
            Self::Unparseable => None,
        }
    }

    /// Shorts are parsed durations of at most two minutes.
    pub fn is_short(&self) -> bool {
        matches!(self, Self::Parsed(s) if *s <= SHORT_MAX_SECONDS)
    }
}
