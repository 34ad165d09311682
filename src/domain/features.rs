//! Feature vector assembly for model inference.

use crate::domain::{PersonalProfile, SensorReading};

/// Number of features the scaler and classifier were trained on.
pub const FEATURE_COUNT: usize = 6;

/// Feature names in trained order.
/// Order: age, gender_numeric, bmi, heart_rate, o2_saturation, body_temperature
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender_numeric",
    "bmi",
    "heart_rate",
    "o2_saturation",
    "body_temperature",
];

/// Ordered numeric input to the scaler/model pair.
///
/// The order is a strict contract with the pre-trained artifacts: any
/// reordering silently corrupts predictions, so assembly happens in exactly
/// one place and the layout is fixed at the type level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Merge a profile and a reading into the trained feature order.
    ///
    /// Pure and deterministic; both inputs were validated upstream.
    #[must_use]
    pub fn assemble(profile: &PersonalProfile, reading: &SensorReading) -> Self {
        Self([
            f64::from(profile.age),
            profile.gender.as_numeric(),
            profile.bmi(),
            reading.heart_rate,
            reading.o2_saturation,
            reading.body_temperature,
        ])
    }

    /// Borrow the raw values in trained order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}
