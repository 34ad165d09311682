//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `thingspeak`: HTTP client for the remote telemetry feed
//! - `artifact`: pre-trained scaler and classifier loaded from disk

pub mod artifact;
pub mod thingspeak;

pub use artifact::{ArtifactError, ModelArtifact};
pub use thingspeak::{FeedConfig, ThingSpeakClient};
