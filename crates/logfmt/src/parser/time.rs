//! Timestamp normalization.
//!
//! Every parser funnels its timestamp through here so that epoch floats,
//! RFC3339 strings and exponent-notation strings all end up as one
//! `DateTime<FixedOffset>`. Offsets present in the source string are kept;
//! epoch values come out in UTC.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{FieldValue, ParseError};

/// Printed in place of a timestamp that could not be determined.
pub const ZERO_TIMESTAMP: &str = "0000-00-00T00:00:00.000000-00:00";

/// Exponent-notation epochs at or above this magnitude are milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

static EXPONENT_EPOCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?[eE][+-]?\d+$").unwrap());

type Layout = fn(&str) -> Option<DateTime<FixedOffset>>;

/// Accepted string layouts. First match wins, so the strict RFC3339 form
/// must come before the looser `%z` layout.
const LAYOUTS: &[(&str, Layout)] = &[
    ("rfc3339", parse_rfc3339),
    ("rfc3339-offset-no-colon", parse_offset_without_colon),
    ("epoch-exponent", parse_exponent_epoch),
];

/// Convert a field value into an absolute time.
///
/// Numbers are epoch seconds with a fractional part. Strings go through
/// [`LAYOUTS`] in order. Non-positive epochs are not rejected here; the
/// renderer decides whether they are worth printing.
pub fn normalize(value: &FieldValue) -> Result<DateTime<FixedOffset>, ParseError> {
    match value {
        FieldValue::Time(t) => Ok(*t),
        FieldValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| ParseError::UnrecognizedTimestamp(n.to_string()))
            .and_then(from_epoch_seconds),
        FieldValue::String(s) => parse_timestamp(s),
        other => Err(ParseError::UnrecognizedTimestamp(other.to_display_string())),
    }
}

/// Epoch seconds to UTC. The fraction is a fraction of a second.
///
/// The fraction is rounded to whole microseconds, not nanoseconds: at
/// present-day epochs an f64 is only good to a few hundred nanoseconds, so
/// the nanosecond digits would be float noise.
pub fn from_epoch_seconds(value: f64) -> Result<DateTime<FixedOffset>, ParseError> {
    if !value.is_finite() {
        return Err(ParseError::UnrecognizedTimestamp(value.to_string()));
    }

    let seconds = value.floor();
    let mut whole = seconds as i64;
    let mut micros = ((value - seconds) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        whole += 1;
        micros = 0;
    }

    DateTime::from_timestamp(whole, micros * 1_000)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| ParseError::UnrecognizedTimestamp(value.to_string()))
}

/// Parse a timestamp string against the accepted layouts.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let text = text.trim();
    for (name, layout) in LAYOUTS {
        if let Some(t) = layout(text) {
            tracing::trace!(layout = name, "timestamp parsed");
            return Ok(t);
        }
    }
    Err(ParseError::UnrecognizedTimestamp(text.to_string()))
}

fn parse_rfc3339(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok()
}

fn parse_offset_without_colon(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z").ok()
}

fn parse_exponent_epoch(text: &str) -> Option<DateTime<FixedOffset>> {
    if !EXPONENT_EPOCH.is_match(text) {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    let seconds = if value >= EPOCH_MILLIS_THRESHOLD { value / 1_000.0 } else { value };
    from_epoch_seconds(seconds).ok()
}
