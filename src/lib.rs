//! # Vitalpoll
//!
//! Health-risk monitor over a remote telemetry feed.
//!
//! This crate provides:
//! - Polling acquisition of physiological readings (heart rate, SpO2,
//!   body temperature) with stale-data fallback
//! - Fixed-order feature assembly from a personal profile plus the latest
//!   valid reading
//! - Binary risk classification through a pre-trained scaler/model pair
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (profile, reading, features, verdict)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (ThingSpeak HTTP, model artifact)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{CycleOutcome, HealthReport, MonitorService, MonitorUpdate};
pub use domain::{Gender, PersonalProfile, RiskVerdict, SensorReading};

/// Result type for Vitalpoll operations
pub type Result<T> = std::result::Result<T, VitalpollError>;

/// Main error type for Vitalpoll
///
/// Acquisition-stage failures never appear here: they are recovered
/// locally by the stale-data fallback and only logged. What remains is
/// fatal either to startup (artifact loading) or to a cycle's output
/// (inference).
#[derive(Debug, thiserror::Error)]
pub enum VitalpollError {
    #[error("Model artifact failed to load: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::InferenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
