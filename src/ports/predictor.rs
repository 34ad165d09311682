//! Predictor port: Trait over the pre-trained scaler and classifier.

use crate::domain::{FeatureVector, RiskVerdict, FEATURE_COUNT};

/// Error type for inference failures.
///
/// Unlike acquisition errors, these are fatal to the current cycle's
/// output: there is no fallback prediction.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The scaler rejected the input
    #[error("Scaler transform failed: {0}")]
    Transform(String),

    /// The classifier rejected the input
    #[error("Model prediction failed: {0}")]
    Predict(String),

    /// The classifier produced something outside {0, 1}
    #[error("Model produced invalid raw label {0}")]
    InvalidLabel(i64),
}

/// Trait for the external scaler/model pair.
///
/// Both artifacts are opaque: the application only sees the
/// `transform`/`predict` contract. Implementations must be deterministic
/// and side-effect-free for a given input so a cycle can be replayed in
/// tests. Tests substitute a stub instead of real serialized artifacts.
pub trait RiskModel: Send + Sync {
    /// Standardize a feature vector using statistics fixed at training time.
    ///
    /// # Errors
    /// Returns `InferenceError::Transform` if the artifact rejects the input.
    fn transform(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], InferenceError>;

    /// Predict the raw binary label for an already-standardized vector.
    ///
    /// # Errors
    /// Returns `InferenceError::Predict` if the artifact rejects the input.
    fn predict(&self, standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError>;

    /// Run the full scale-then-predict pipeline and map to a verdict.
    ///
    /// # Errors
    /// Propagates artifact failures; returns `InferenceError::InvalidLabel`
    /// if the raw output is anything other than 0 or 1.
    fn classify(&self, features: &FeatureVector) -> Result<RiskVerdict, InferenceError> {
        let standardized = self.transform(features)?;
        let label = self.predict(&standardized)?;
        RiskVerdict::from_raw_label(label).ok_or(InferenceError::InvalidLabel(label))
    }
}
