//! Parsing and formatting of instants at the crate boundary.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{LocalDaysError, Result};

/// Parse an RFC 3339 datetime string into an instant.
///
/// Any offset is accepted; the result is normalized to UTC.
///
/// # Errors
///
/// Returns [`LocalDaysError::InvalidInstant`] if the string is not RFC 3339.
///
/// # Examples
///
/// ```
/// use local_days::parse_instant;
///
/// let instant = parse_instant("2022-03-27T02:00:00+01:00").unwrap();
/// assert_eq!(instant.to_rfc3339(), "2022-03-27T01:00:00+00:00");
/// ```
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LocalDaysError::InvalidInstant(format!("'{}': {}", s, e)))
}

/// Format an instant as RFC 3339 in `zone`, with a `Z` suffix for UTC.
///
/// Sub-second digits are only printed when present.
pub fn format_instant<Z: TimeZone>(instant: DateTime<Utc>, zone: &Z) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant
        .with_timezone(zone)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
