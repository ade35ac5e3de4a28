//! The match-function capability consumed by the estimator

use crate::error::check_probability;
use crate::{Record, Result};
use serde::{Deserialize, Serialize};

/// A pair of records handed to a match function
pub type RecordPair<'a> = (&'a Record, &'a Record);

/// A metric with its confidence bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(estimate: f64, lower: f64, upper: f64) -> Self {
        Self {
            estimate,
            lower,
            upper,
        }
    }

    /// Interval collapsed onto a single value
    pub fn exact(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Apply `f` to the estimate and both bounds independently
    pub fn try_map<F>(self, mut f: F) -> Result<Self>
    where
        F: FnMut(f64) -> Result<f64>,
    {
        Ok(Self {
            estimate: f(self.estimate)?,
            lower: f(self.lower)?,
            upper: f(self.upper)?,
        })
    }

    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        Self {
            estimate: f(self.estimate),
            lower: f(self.lower),
            upper: f(self.upper),
        }
    }

    /// Check all three values are probabilities
    pub fn validate(&self, name: &'static str) -> Result<()> {
        check_probability(name, self.estimate)?;
        check_probability(name, self.lower)?;
        check_probability(name, self.upper)?;
        Ok(())
    }
}

/// Decisions returned by [`MatchFunction::batch_match`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchBatch {
    /// One decision per input pair, in input order
    pub matches: Vec<bool>,
    /// Auxiliary per-pair scores (e.g. match probabilities); may be empty
    pub scores: Vec<f64>,
}

impl MatchBatch {
    pub fn new(matches: Vec<bool>, scores: Vec<f64>) -> Self {
        Self { matches, scores }
    }

    pub fn match_count(&self) -> u64 {
        self.matches.iter().filter(|m| **m).count() as u64
    }
}

/// A pairwise match function validated on labeled data.
///
/// Implementations decide matches at their fixed operating threshold and
/// report the precision and recall they achieved on the validation set at
/// that threshold, together with the validation set's class balance.
pub trait MatchFunction {
    /// Score a batch of record pairs
    fn batch_match(&self, pairs: &[RecordPair<'_>]) -> Result<MatchBatch>;

    /// Validation precision with confidence bounds
    fn precision(&self) -> Interval;

    /// Validation recall with confidence bounds
    fn recall(&self) -> Interval;

    /// Class balance of the validation data
    fn class_balance(&self) -> f64;
}

impl<M: MatchFunction + ?Sized> MatchFunction for &M {
    fn batch_match(&self, pairs: &[RecordPair<'_>]) -> Result<MatchBatch> {
        (**self).batch_match(pairs)
    }

    fn precision(&self) -> Interval {
        (**self).precision()
    }

    fn recall(&self) -> Interval {
        (**self).recall()
    }

    fn class_balance(&self) -> f64 {
        (**self).class_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_interval_map() {
        let interval = Interval::new(0.5, 0.4, 0.6);
        let doubled = interval.map(|v| v * 2.0);
        assert_eq!(doubled, Interval::new(1.0, 0.8, 1.2));
    }

    #[test]
    fn test_interval_try_map_propagates_error() {
        let interval = Interval::new(0.5, 0.4, 0.6);
        let result = interval.try_map(|v| {
            if v > 0.55 {
                Err(Error::MatchFunction("too high".to_string()))
            } else {
                Ok(v)
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_interval_validate() {
        assert!(Interval::new(0.9, 0.85, 0.95).validate("precision").is_ok());
        assert!(Interval::new(0.9, 0.85, 1.05).validate("precision").is_err());
    }

    #[test]
    fn test_match_count() {
        let batch = MatchBatch::new(vec![true, false, true], Vec::new());
        assert_eq!(batch.match_count(), 2);
    }
}
