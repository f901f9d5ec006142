//! Time codec.
//!
//! Race times are stored canonically as fractional seconds with millisecond
//! resolution. Coaches enter them as three separate fields (minutes, seconds,
//! milliseconds), so this module converts between the two shapes and renders
//! the `MM:SS.mmm` display string.
//!
//! Parsing is permissive: a component that is negative, not a number, or not
//! parseable counts as zero. Nothing here returns an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for a missing or unrepresentable time.
pub const NO_TIME: &str = "-";

/// A race time split into its display components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeParts {
    pub minutes: u64,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl TimeParts {
    /// Canonical seconds for these components.
    pub fn to_seconds(self) -> f64 {
        encode(
            self.minutes as f64,
            self.seconds as f64,
            self.milliseconds as f64,
        )
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}.{:03}",
            self.minutes, self.seconds, self.milliseconds
        )
    }
}

/// Combine minutes, seconds and milliseconds into canonical seconds.
///
/// `seconds` may carry a fraction of its own ("12.34"); it is added to
/// `milliseconds / 1000` rather than replacing it, so free-form entry like
/// `(0, "30.5", "20")` yields `30.52`.
pub fn encode(minutes: f64, seconds: f64, milliseconds: f64) -> f64 {
    sanitize(minutes) * 60.0 + sanitize(seconds) + sanitize(milliseconds) / 1000.0
}

/// Encode free-text form fields.
///
/// Minutes and milliseconds are read as integers (a decimal part is
/// truncated), seconds as a decimal. A decimal comma is accepted.
pub fn encode_text(minutes: &str, seconds: &str, milliseconds: &str) -> f64 {
    encode(
        parse_leading_number(minutes).trunc(),
        parse_leading_number(seconds),
        parse_leading_number(milliseconds).trunc(),
    )
}

/// Split canonical seconds into display components.
///
/// Rounding happens once, on the whole value in milliseconds, so a fraction
/// that rounds up to a full second carries into the seconds (and minutes)
/// instead of producing `1000` milliseconds.
pub fn decode(time_seconds: f64) -> TimeParts {
    if !time_seconds.is_finite() || time_seconds <= 0.0 {
        return TimeParts::default();
    }

    let total_ms = (time_seconds * 1000.0).round() as u64;
    TimeParts {
        minutes: total_ms / 60_000,
        seconds: ((total_ms / 1000) % 60) as u32,
        milliseconds: (total_ms % 1000) as u32,
    }
}

/// Render a time as zero-padded `MM:SS.mmm`.
///
/// Non-finite and negative values render as [`NO_TIME`].
pub fn format(time_seconds: f64) -> String {
    if !time_seconds.is_finite() || time_seconds < 0.0 {
        return NO_TIME.to_string();
    }
    decode(time_seconds).to_string()
}

/// Render an optional time; `None` renders as [`NO_TIME`].
pub fn format_opt(time_seconds: Option<f64>) -> String {
    time_seconds.map_or_else(|| NO_TIME.to_string(), format)
}

/// Pace normalised to 100 metres.
///
/// Returns `None` for a zero distance.
pub fn derive_pace(time_seconds: f64, distance_meters: u32) -> Option<f64> {
    if distance_meters == 0 {
        return None;
    }
    Some(time_seconds / (distance_meters as f64 / 100.0))
}

fn sanitize(component: f64) -> f64 {
    if component.is_finite() && component > 0.0 {
        component
    } else {
        0.0
    }
}

/// Read the longest numeric prefix of `input` (`[+-]digits[.digits]`).
///
/// Returns `0.0` when there is no numeric prefix at all.
fn parse_leading_number(input: &str) -> f64 {
    let trimmed = input.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' | ',' if !seen_point => seen_point = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }

    trimmed[..end]
        .replace(',', ".")
        .trim_end_matches('.')
        .parse()
        .unwrap_or(0.0)
}
