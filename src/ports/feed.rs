//! Feed source port: Trait for the remote telemetry endpoint.

use serde::{Deserialize, Serialize};

/// Error type for feed acquisition.
///
/// Every variant is recoverable: the acquisition stage treats any fetch
/// failure as "no new reading available" and falls back to the cache.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection-level failure (DNS, TCP, TLS, timeout)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Endpoint answered outside the 2xx range
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// Body was not the expected JSON shape
    #[error("Malformed feed body: {0}")]
    MalformedBody(String),
}

/// One raw record of the remote feed, before validation.
///
/// The endpoint reports telemetry values as strings and omits or nulls
/// fields freely, so everything here is optional. Field names follow the
/// channel configuration: field1 = heart rate, field2 = SpO2,
/// field3 = body temperature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Sample creation time (ISO-8601 UTC, `Z` suffix)
    pub created_at: Option<String>,

    /// Heart rate in bpm, numeric-as-string
    #[serde(rename = "field1")]
    pub heart_rate: Option<String>,

    /// Blood-oxygen saturation in %, numeric-as-string
    #[serde(rename = "field2")]
    pub o2_saturation: Option<String>,

    /// Body temperature in °C, numeric-as-string
    #[serde(rename = "field3")]
    pub body_temperature: Option<String>,
}

/// Decoded body of one feed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedResponse {
    /// Samples in the order the endpoint returned them
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// Trait for fetching the remote telemetry feed.
///
/// Implementations perform exactly one network round-trip per call and
/// never retry internally; the refresh loop's periodicity is the retry
/// policy. Tests substitute an in-memory stub.
pub trait FeedSource: Send + Sync {
    /// Fetch and decode the current feed.
    ///
    /// # Errors
    /// Returns `FetchError` on transport failure, non-2xx status, or an
    /// undecodable body. An empty `feeds` list is not an error at this
    /// boundary; the acquisition stage reports it distinctly.
    fn fetch(&self) -> Result<FeedResponse, FetchError>;
}
