//! ThingSpeak adapter: Implementation of `FeedSource` over HTTP.
//!
//! Performs one blocking GET against the channel's `feeds.json` endpoint
//! per call. Retrying is deliberately absent here: the refresh loop polls
//! on a fixed cadence, and that cadence is the only retry policy. A failed
//! round-trip is equivalent to "no new reading this cycle".

use std::time::Duration;

use crate::ports::{FeedResponse, FeedSource, FetchError};

/// Default channel parameters, overridable via environment.
const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";
const DEFAULT_CHANNEL_ID: &str = "2802771";
const DEFAULT_API_KEY: &str = "BVPSP1KOVBKQWW5K";

const BASE_URL_ENV: &str = "VITALPOLL_BASE_URL";
const CHANNEL_ID_ENV: &str = "VITALPOLL_CHANNEL_ID";
const API_KEY_ENV: &str = "VITALPOLL_API_KEY";

/// A hung connection stalls the whole cycle, so cap it well below two
/// refresh periods.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint configuration for one telemetry channel.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Scheme and host, no trailing slash
    pub base_url: String,
    /// ThingSpeak channel identifier
    pub channel_id: String,
    /// Channel read key, passed as a query parameter
    pub api_key: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl FeedConfig {
    /// Build a config from the environment, defaulting any unset variable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url),
            channel_id: std::env::var(CHANNEL_ID_ENV).unwrap_or(defaults.channel_id),
            api_key: std::env::var(API_KEY_ENV).unwrap_or(defaults.api_key),
        }
    }

    /// Full `feeds.json` URL for this channel.
    #[must_use]
    pub fn feeds_url(&self) -> String {
        format!(
            "{}/channels/{}/feeds.json?api_key={}",
            self.base_url, self.channel_id, self.api_key
        )
    }
}

/// Blocking HTTP implementation of `FeedSource` using a `ureq` agent.
pub struct ThingSpeakClient {
    agent: ureq::Agent,
    url: String,
}

impl ThingSpeakClient {
    /// Create a client with a pooled agent and a fixed request timeout.
    #[must_use]
    pub fn new(config: &FeedConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("vitalpoll/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            url: config.feeds_url(),
        }
    }
}

impl FeedSource for ThingSpeakClient {
    fn fetch(&self) -> Result<FeedResponse, FetchError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(e)) => return Err(FetchError::Transport(e.to_string())),
        };

        response
            .into_json::<FeedResponse>()
            .map_err(|e| FetchError::MalformedBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feeds_url_shape() {
        let config = FeedConfig {
            base_url: "https://example.test".to_string(),
            channel_id: "42".to_string(),
            api_key: "SECRET".to_string(),
        };
        assert_eq!(
            config.feeds_url(),
            "https://example.test/channels/42/feeds.json?api_key=SECRET"
        );
    }

    #[test]
    fn test_default_config_targets_thingspeak() {
        let config = FeedConfig::default();
        assert!(config.feeds_url().starts_with("https://api.thingspeak.com/"));
        assert!(config.feeds_url().contains(&config.channel_id));
    }
}
