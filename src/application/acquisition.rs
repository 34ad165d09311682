//! Reading acquisition: validation tiers and the stale-data cache.
//!
//! A raw feed record passes three gates in order: presence of all four
//! fields, numeric coercion of the three telemetry values, and timestamp
//! format. A single bad field invalidates the whole record; the cache is
//! only ever replaced by a record that cleared every gate, so it never
//! holds a partially updated reading.

use chrono::NaiveDateTime;

use crate::domain::time::{self, TimestampFormatError};
use crate::domain::SensorReading;
use crate::ports::{FeedEntry, FetchError};

/// Error type for one failed validation gate.
///
/// Non-fatal by policy: the acquisition stage logs it and serves the
/// cached reading instead.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent or null
    #[error("Feed record is missing required field {0:?}")]
    MissingField(&'static str),

    /// A telemetry value did not parse as a float
    #[error("Field {field:?} value {value:?} is not numeric")]
    ValueCoercion { field: &'static str, value: String },

    /// The creation timestamp did not match the wire format
    #[error(transparent)]
    TimestampFormat(#[from] TimestampFormatError),
}

/// Error type covering the whole acquisition stage.
///
/// Every variant is recovered locally by cache fallback; this exists for
/// observability, not propagation.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Endpoint answered, but the channel holds no samples
    #[error("Feed contains no entries")]
    EmptyFeed,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Last known-good reading, held for the life of the process.
///
/// The cache never expires on its own: a reading stays servable until a
/// newer valid one replaces it, and the presenter surfaces the reading's
/// timestamp so a human can judge freshness. Constructed empty and owned
/// by the refresh loop; tests build isolated instances.
#[derive(Debug, Default)]
pub struct ReadingCache {
    last_valid: Option<SensorReading>,
}

impl ReadingCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last known-good reading, if any cycle has produced one.
    #[must_use]
    pub fn read(&self) -> Option<&SensorReading> {
        self.last_valid.as_ref()
    }

    /// Unconditionally replace the cached reading.
    ///
    /// Called only after full validation success.
    pub fn write(&mut self, reading: SensorReading) {
        self.last_valid = Some(reading);
    }
}

/// Pick the most recent entry of a feed by its creation timestamp.
///
/// The endpoint claims chronological order but nothing enforces it, so
/// entries are compared by parsed `created_at` instead of position.
/// Entries without a parseable timestamp cannot win the comparison; if no
/// entry has one, the positional last element is returned and left for
/// validation to reject.
#[must_use]
pub fn select_latest(feeds: &[FeedEntry]) -> Option<&FeedEntry> {
    let newest = feeds
        .iter()
        .filter_map(|entry| Some((parse_created_at(entry)?, entry)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, entry)| entry);

    newest.or_else(|| feeds.last())
}

fn parse_created_at(entry: &FeedEntry) -> Option<NaiveDateTime> {
    let created_at = entry.created_at.as_deref()?;
    time::parse_feed_timestamp(created_at).ok()
}

/// Run the three validation gates over a raw feed record.
///
/// # Errors
/// Returns the first failed gate; the caller must leave the cache
/// untouched in that case.
pub fn validate_entry(entry: &FeedEntry) -> Result<SensorReading, ValidationError> {
    // Gate 1: presence.
    let timestamp = present("created_at", entry.created_at.as_deref())?;
    let heart_rate = present("field1", entry.heart_rate.as_deref())?;
    let o2_saturation = present("field2", entry.o2_saturation.as_deref())?;
    let body_temperature = present("field3", entry.body_temperature.as_deref())?;

    // Gate 2: numeric coercion.
    let heart_rate = coerce("field1", heart_rate)?;
    let o2_saturation = coerce("field2", o2_saturation)?;
    let body_temperature = coerce("field3", body_temperature)?;

    // Gate 3: timestamp format.
    time::parse_feed_timestamp(timestamp)?;

    Ok(SensorReading::new(
        timestamp,
        heart_rate,
        o2_saturation,
        body_temperature,
    ))
}

fn present<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn coerce(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::ValueCoercion {
            field,
            value: value.to_string(),
        })
}
