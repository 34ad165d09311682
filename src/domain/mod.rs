//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O dependencies.
//! All validation here is strict: a value either satisfies its
//! invariants or it is rejected whole.

mod features;
mod profile;
mod reading;
pub mod time;
mod verdict;

pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use profile::{Gender, PersonalProfile};
pub use reading::SensorReading;
pub use verdict::RiskVerdict;
