//! Validated telemetry reading types.

use serde::{Deserialize, Serialize};

/// One validated telemetry sample.
///
/// All four fields are jointly present and numeric by construction: the
/// validator either builds a complete reading or rejects the raw record
/// outright, so a `SensorReading` never carries a partial update.
/// Immutable once constructed; superseded by the next valid reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Sample creation time as reported by the feed (ISO-8601, `Z` suffix)
    pub timestamp_utc: String,

    /// Heart rate in beats per minute
    pub heart_rate: f64,

    /// Blood-oxygen saturation in percent
    pub o2_saturation: f64,

    /// Body temperature in degrees Celsius
    pub body_temperature: f64,
}

impl SensorReading {
    /// Create a reading from already-coerced values.
    #[must_use]
    pub fn new(
        timestamp_utc: impl Into<String>,
        heart_rate: f64,
        o2_saturation: f64,
        body_temperature: f64,
    ) -> Self {
        Self {
            timestamp_utc: timestamp_utc.into(),
            heart_rate,
            o2_saturation,
            body_temperature,
        }
    }
}
