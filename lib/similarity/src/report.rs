//! Validation statistics carried by a match function

use erbound_core::Interval;
use serde::{Deserialize, Serialize};

/// Precision and recall measured on a labeled validation set at the
/// matcher's threshold, plus that set's pairwise class balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub precision: Interval,
    pub recall: Interval,
    pub class_balance: f64,
}

impl ValidationReport {
    pub fn new(precision: Interval, recall: Interval, class_balance: f64) -> Self {
        Self {
            precision,
            recall,
            class_balance,
        }
    }

    /// Check ranges and that each estimate sits inside its interval
    pub fn validate(&self) -> Result<(), MatcherError> {
        for (name, interval) in [("precision", self.precision), ("recall", self.recall)] {
            let values = [interval.estimate, interval.lower, interval.upper];
            if values.iter().any(|v| !v.is_finite() || !(0.0..=1.0).contains(v)) {
                return Err(MatcherError::OutOfRange(name.to_string()));
            }
            if interval.lower > interval.estimate || interval.estimate > interval.upper {
                return Err(MatcherError::UnorderedInterval(name.to_string()));
            }
        }
        if !self.class_balance.is_finite() || !(0.0..=1.0).contains(&self.class_balance) {
            return Err(MatcherError::OutOfRange("class_balance".to_string()));
        }
        Ok(())
    }
}

/// Errors raised while building a match function
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatcherError {
    #[error("'{0}' must lie in [0, 1]")]
    OutOfRange(String),

    #[error("'{0}' interval must satisfy lower <= estimate <= upper")]
    UnorderedInterval(String),

    #[error("Field rules cannot be empty")]
    NoRules,

    #[error("Field '{0}' has negative weight")]
    NegativeWeight(String),

    #[error("Total rule weight cannot be zero")]
    ZeroTotalWeight,

    #[error("Threshold {0} is not finite")]
    InvalidThreshold(f32),
}

impl From<MatcherError> for erbound_core::Error {
    fn from(err: MatcherError) -> Self {
        erbound_core::Error::InvalidConfig(err.to_string())
    }
}
