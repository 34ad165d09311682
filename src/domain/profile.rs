//! Personal biometric profile supplied by the presentation shell.

use serde::{Deserialize, Serialize};

/// Gender as the model was trained on it (binary encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Numeric encoding used in the feature vector: Male = 1.0, Female = 0.0.
    #[must_use]
    pub fn as_numeric(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }
}

/// User-supplied biometric attributes.
///
/// Created fresh each acquisition cycle from external input; never persisted.
/// BMI is always derived from weight and height, never stored, so the two
/// can never drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalProfile {
    /// Age in years (0-120)
    pub age: u32,

    /// Gender (binary, per the trained model)
    pub gender: Gender,

    /// Body weight in kilograms, (10, 200]
    pub weight_kg: f64,

    /// Height in centimeters, (50, 250]
    pub height_cm: f64,
}

impl PersonalProfile {
    /// Create a profile, checking every field against its expected range.
    ///
    /// # Errors
    /// Returns all range violations as a vector of strings.
    pub fn new(
        age: u32,
        gender: Gender,
        weight_kg: f64,
        height_cm: f64,
    ) -> Result<Self, Vec<String>> {
        let profile = Self {
            age,
            gender,
            weight_kg,
            height_cm,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Validate that all attributes are within expected ranges.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.age > 120 {
            errors.push(format!("Age {} out of range [0, 120]", self.age));
        }
        if !(self.weight_kg > 10.0 && self.weight_kg <= 200.0) {
            errors.push(format!(
                "Weight {} kg out of range (10, 200]",
                self.weight_kg
            ));
        }
        if !(self.height_cm > 50.0 && self.height_cm <= 250.0) {
            errors.push(format!(
                "Height {} cm out of range (50, 250]",
                self.height_cm
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Body-mass index in kg/m², rounded to 2 decimal places.
    ///
    /// Recomputed on every call so it always reflects the current
    /// weight and height.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let meters = self.height_cm / 100.0;
        let raw = self.weight_kg / (meters * meters);
        (raw * 100.0).round() / 100.0
    }
}
