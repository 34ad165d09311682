//! Risk classification output types.

use serde::{Deserialize, Serialize};

/// Binary health-risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskVerdict {
    /// No significant risk indicators
    LowRisk,
    /// Elevated risk, attention recommended
    HighRisk,
}

impl RiskVerdict {
    /// Map the model's raw binary output to a verdict.
    ///
    /// Only `0` and `1` are valid model outputs; anything else means the
    /// artifact and this code disagree about the contract and the caller
    /// must treat it as an inference failure, not a verdict.
    #[must_use]
    pub fn from_raw_label(label: i64) -> Option<Self> {
        match label {
            1 => Some(Self::HighRisk),
            0 => Some(Self::LowRisk),
            _ => None,
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::LowRisk => "Low risk - No significant indicators",
            Self::HighRisk => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowRisk => write!(f, "Low Risk"),
            Self::HighRisk => write!(f, "High Risk"),
        }
    }
}
