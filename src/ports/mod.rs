//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (the telemetry endpoint
//! and the pre-trained model artifacts).

mod feed;
mod predictor;

pub use feed::{FeedEntry, FeedResponse, FeedSource, FetchError};
pub use predictor::{InferenceError, RiskModel};
