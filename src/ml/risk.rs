//! Risk bucketing
//!
//! Maps a churn probability onto the discrete Low/Medium/High scale shown to
//! operators. The thresholds are part of the API contract and shared with
//! existing consumers, so they are fixed here rather than configurable.

use serde::{Deserialize, Serialize};

/// Probabilities below this are Low risk.
pub const MEDIUM_THRESHOLD: f64 = 0.3;
/// Probabilities at or above this are High risk.
pub const HIGH_THRESHOLD: f64 = 0.7;

/// Discretized churn risk. Boundary values land in the upper bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a probability: [0, 0.3) Low, [0.3, 0.7) Medium, [0.7, 1.0] High.
    pub fn from_probability(probability: f64) -> Self {
        if probability < MEDIUM_THRESHOLD {
            RiskLevel::Low
        } else if probability < HIGH_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
