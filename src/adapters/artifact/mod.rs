//! Artifact adapter: Implementation of `RiskModel` from serialized parameters.
//!
//! The training pipeline exports one JSON file carrying the standard
//! scaler's statistics and the logistic classifier's weights. Both were
//! fixed at training time; this adapter only evaluates them. Loading
//! happens once at startup and any defect in the file is fatal there,
//! never at inference time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{InferenceError, RiskModel};

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact format: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Artifact rejected: {0}")]
    Invalid(String),
}

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    /// Feature names in trained order, checked against `FEATURE_NAMES`
    pub feature_names: Vec<String>,
    /// Standard-scaler per-feature mean
    pub scaler_mean: Vec<f64>,
    /// Standard-scaler per-feature standard deviation
    pub scaler_scale: Vec<f64>,
    /// Logistic-regression coefficients
    pub coefficients: Vec<f64>,
    /// Logistic-regression intercept
    pub intercept: f64,
}

/// Pre-trained scaler + classifier pair.
pub struct ModelArtifact {
    scaler_mean: [f64; FEATURE_COUNT],
    scaler_scale: [f64; FEATURE_COUNT],
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl ModelArtifact {
    /// Load and validate the artifact from a JSON file.
    ///
    /// # Errors
    /// Returns `ArtifactError` on I/O failure, malformed JSON, or
    /// parameters that fail the sanity checks. All of these are fatal
    /// at startup.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path)?;
        let exported: ExportedModel = serde_json::from_slice(&bytes)?;
        Self::from_exported(exported)
    }

    /// Validate an in-memory export and freeze it into fixed-size arrays.
    ///
    /// # Errors
    /// Returns `ArtifactError::Invalid` on wrong arity, reordered feature
    /// names, non-finite parameters, or a degenerate scaler.
    pub fn from_exported(exported: ExportedModel) -> Result<Self, ArtifactError> {
        if exported.feature_names != FEATURE_NAMES {
            return Err(ArtifactError::Invalid(format!(
                "Feature names {:?} do not match trained order {:?}",
                exported.feature_names, FEATURE_NAMES
            )));
        }

        let scaler_mean = fixed_arity("scaler_mean", &exported.scaler_mean)?;
        let scaler_scale = fixed_arity("scaler_scale", &exported.scaler_scale)?;
        let coefficients = fixed_arity("coefficients", &exported.coefficients)?;

        if !exported.intercept.is_finite() {
            return Err(ArtifactError::Invalid("intercept is not finite".into()));
        }
        if scaler_scale.iter().any(|s| *s <= 0.0) {
            return Err(ArtifactError::Invalid(
                "scaler_scale entries must be strictly positive".into(),
            ));
        }

        Ok(Self {
            scaler_mean,
            scaler_scale,
            coefficients,
            intercept: exported.intercept,
        })
    }
}

fn fixed_arity(name: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ArtifactError> {
    let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
        ArtifactError::Invalid(format!(
            "{name} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ))
    })?;
    if array.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::Invalid(format!(
            "{name} contains a non-finite entry"
        )));
    }
    Ok(array)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl RiskModel for ModelArtifact {
    fn transform(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], InferenceError> {
        let mut standardized = *features.as_slice();
        for (value, (mean, scale)) in standardized
            .iter_mut()
            .zip(self.scaler_mean.iter().zip(self.scaler_scale.iter()))
        {
            *value = (*value - mean) / scale;
        }
        if standardized.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::Transform(
                "standardized vector is not finite".into(),
            ));
        }
        Ok(standardized)
    }

    fn predict(&self, standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
        let z: f64 = standardized
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;
        if !z.is_finite() {
            return Err(InferenceError::Predict("decision value is not finite".into()));
        }
        Ok(i64::from(sigmoid(z) >= 0.5))
    }
}
