//! Conversion between provider ISO-8601 timestamps and epoch milliseconds.
//!
//! GitHub returns timestamps as `YYYY-MM-DDTHH:MM:SSZ`. Normalized records
//! carry UTC epoch milliseconds; an absent or empty timestamp is "no value",
//! never zero.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use super::error::FetchError;

/// Parses an ISO-8601 timestamp into UTC epoch milliseconds.
///
/// Empty input yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`FetchError::InvalidTimestamp`] when the text is not a valid
/// RFC 3339 timestamp.
///
/// # Example
///
/// ```
/// use pullfetch::github::timestamp::parse_timestamp;
///
/// let millis = parse_timestamp("2011-01-26T19:01:12Z").expect("valid timestamp");
/// assert_eq!(millis, Some(1_296_068_472_000));
/// assert_eq!(parse_timestamp("").expect("empty is allowed"), None);
/// ```
pub fn parse_timestamp(value: &str) -> Result<Option<i64>, FetchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| Some(parsed.timestamp_millis()))
        .map_err(|error| FetchError::InvalidTimestamp {
            value: value.to_owned(),
            message: error.to_string(),
        })
}

/// Renders epoch milliseconds as an ISO-8601 UTC timestamp.
///
/// Sub-second precision is only printed when the value carries it, so a
/// value parsed from `YYYY-MM-DDTHH:MM:SSZ` renders back to the same text.
///
/// Returns `None` when the value is outside the representable range.
#[must_use]
pub fn format_timestamp(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Serde adapter decoding an optional ISO-8601 string into epoch milliseconds.
pub(crate) fn deserialize_optional_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(text) => parse_timestamp(&text).map_err(serde::de::Error::custom),
    }
}
