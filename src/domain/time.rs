//! Timestamp normalization from feed UTC to the display time zone.

use chrono::{FixedOffset, NaiveDateTime};

/// The feed reports timestamps as `YYYY-MM-DDTHH:MM:SSZ`.
const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Display format, e.g. `01 March 2024, 17:00:00`.
const DISPLAY_FORMAT: &str = "%d %B %Y, %H:%M:%S";

/// Display offset: Indochina Time (UTC+7). ICT observes no DST, so a fixed
/// offset is exact year-round.
const ICT_OFFSET_SECS: i32 = 7 * 3600;

/// Error for timestamps that do not match the feed's wire format.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Malformed feed timestamp {value:?}: {source}")]
pub struct TimestampFormatError {
    /// The offending input
    pub value: String,
    source: chrono::ParseError,
}

/// Parse a feed UTC timestamp, rejecting anything off-format.
///
/// Used by validation as the format gate: a reading whose timestamp fails
/// here is invalid as a whole and must not reach the cache.
///
/// # Errors
/// Returns `TimestampFormatError` if the input is not `YYYY-MM-DDTHH:MM:SSZ`.
pub fn parse_feed_timestamp(value: &str) -> Result<NaiveDateTime, TimestampFormatError> {
    NaiveDateTime::parse_from_str(value, FEED_TIMESTAMP_FORMAT).map_err(|source| {
        TimestampFormatError {
            value: value.to_string(),
            source,
        }
    })
}

/// Convert a feed UTC timestamp into a human-readable Indochina Time string.
///
/// Pure function; no side effects.
///
/// # Errors
/// Returns `TimestampFormatError` if the input is malformed.
pub fn to_local_display(value: &str) -> Result<String, TimestampFormatError> {
    let utc = parse_feed_timestamp(value)?;
    // Offset construction is infallible for a constant within +/-24h.
    let ict = FixedOffset::east_opt(ICT_OFFSET_SECS).unwrap();
    let local = utc.and_utc().with_timezone(&ict);
    Ok(local.format(DISPLAY_FORMAT).to_string())
}
