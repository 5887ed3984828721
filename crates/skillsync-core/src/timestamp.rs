//! Human-readable UTC timestamps.
//!
//! The document records its freshness as `updated: YYYY-MM-DD HH:MM:SS UTC`.
//! The same parser also reads sitemap `<lastmod>` values and HTTP
//! `Last-Modified` headers, so it accepts every shape those sources emit.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A point in time, always UTC.
pub type Timestamp = DateTime<Utc>;

/// Canonical rendering used in the document's metadata block.
const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Parse a timestamp, returning `None` on anything unparseable.
///
/// Accepted shapes:
/// - `2024-01-15 10:30:00 UTC` (canonical document form)
/// - `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+02:00`, `2024-01-15T10:30:00.123Z`
/// - `2024-01-15T10:30:00` (naive, assumed UTC)
/// - `2024-01-15` (midnight UTC)
/// - `Wed, 21 Oct 2015 07:28:00 GMT` (HTTP header form)
///
/// ```
/// use skillsync_core::timestamp::{format_timestamp, parse_timestamp};
///
/// let ts = parse_timestamp("2024-01-01 00:00:00 UTC").unwrap();
/// assert_eq!(format_timestamp(&ts), "2024-01-01 00:00:00 UTC");
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // `2024-01-15 10:30:00 UTC` becomes `2024-01-15T10:30:00Z`
    let normalized = trimmed.replacen(" UTC", "Z", 1).replacen(' ', "T", 1);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    tracing::debug!(value = %trimmed, "Could not parse timestamp");
    None
}

/// Render a timestamp in the canonical `YYYY-MM-DD HH:MM:SS UTC` form.
///
/// Sub-second precision is dropped.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.format(CANONICAL_FORMAT).to_string()
}
