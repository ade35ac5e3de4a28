//! Concrete match functions
//!
//! Both matchers score a pair, accept it when the score reaches the
//! threshold, and report the validation statistics they were built with.

use crate::{FieldRules, MatcherError, ValidationReport};
use erbound_core::{Interval, MatchBatch, MatchFunction, Record, RecordPair};
use serde::{Deserialize, Serialize};

/// Default decision threshold
pub const DEFAULT_THRESHOLD: f32 = 0.5;

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn check_threshold(threshold: f32) -> Result<f32, MatcherError> {
    if threshold.is_finite() {
        Ok(threshold)
    } else {
        Err(MatcherError::InvalidThreshold(threshold))
    }
}

/// Similarity between feature vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VectorMetric {
    #[default]
    Cosine,
    /// 1 / (1 + euclidean distance)
    Euclidean,
    Dot,
}

impl VectorMetric {
    pub fn score(&self, a: &Record, b: &Record) -> f32 {
        match self {
            VectorMetric::Cosine => a.features.cosine_similarity(&b.features),
            VectorMetric::Euclidean => 1.0 / (1.0 + a.features.l2_distance(&b.features)),
            VectorMetric::Dot => a.features.dot(&b.features),
        }
    }
}

/// Matches records whose feature vectors are similar enough
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatcher {
    metric: VectorMetric,
    threshold: f32,
    report: ValidationReport,
}

impl VectorMatcher {
    pub fn new(
        metric: VectorMetric,
        threshold: f32,
        report: ValidationReport,
    ) -> Result<Self, MatcherError> {
        report.validate()?;
        Ok(Self {
            metric,
            threshold: check_threshold(threshold)?,
            report,
        })
    }

    pub fn metric(&self) -> VectorMetric {
        self.metric
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl MatchFunction for VectorMatcher {
    fn batch_match(&self, pairs: &[RecordPair<'_>]) -> erbound_core::Result<MatchBatch> {
        Ok(decide(pairs, self.threshold, |a, b| self.metric.score(a, b)))
    }

    fn precision(&self) -> Interval {
        self.report.precision
    }

    fn recall(&self) -> Interval {
        self.report.recall
    }

    fn class_balance(&self) -> f64 {
        self.report.class_balance
    }
}

/// Matches records whose payloads agree on weighted field rules
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatcher {
    rules: FieldRules,
    threshold: f32,
    report: ValidationReport,
}

impl FieldMatcher {
    pub fn new(
        rules: FieldRules,
        threshold: f32,
        report: ValidationReport,
    ) -> Result<Self, MatcherError> {
        report.validate()?;
        Ok(Self {
            rules,
            threshold: check_threshold(threshold)?,
            report,
        })
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }
}

impl MatchFunction for FieldMatcher {
    fn batch_match(&self, pairs: &[RecordPair<'_>]) -> erbound_core::Result<MatchBatch> {
        Ok(decide(pairs, self.threshold, |a, b| {
            self.rules.score(a.payload.as_ref(), b.payload.as_ref())
        }))
    }

    fn precision(&self) -> Interval {
        self.report.precision
    }

    fn recall(&self) -> Interval {
        self.report.recall
    }

    fn class_balance(&self) -> f64 {
        self.report.class_balance
    }
}

fn decide<F>(pairs: &[RecordPair<'_>], threshold: f32, score: F) -> MatchBatch
where
    F: Fn(&Record, &Record) -> f32,
{
    let scores: Vec<f64> = pairs.iter().map(|(a, b)| score(a, b) as f64).collect();
    let matches = scores.iter().map(|s| *s >= threshold as f64).collect();
    MatchBatch::new(matches, scores)
}

/// Serializable description of a match function
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatcherSpec {
    Vector {
        #[serde(default)]
        metric: VectorMetric,
        #[serde(default = "default_threshold")]
        threshold: f32,
        validation: ValidationReport,
    },
    Field {
        rules: FieldRules,
        #[serde(default = "default_threshold")]
        threshold: f32,
        validation: ValidationReport,
    },
}

impl MatcherSpec {
    pub fn build(self) -> Result<AnyMatcher, MatcherError> {
        match self {
            MatcherSpec::Vector {
                metric,
                threshold,
                validation,
            } => VectorMatcher::new(metric, threshold, validation).map(AnyMatcher::Vector),
            MatcherSpec::Field {
                rules,
                threshold,
                validation,
            } => FieldMatcher::new(rules, threshold, validation).map(AnyMatcher::Field),
        }
    }
}

/// Either concrete matcher
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMatcher {
    Vector(VectorMatcher),
    Field(FieldMatcher),
}

impl AnyMatcher {
    fn inner(&self) -> &dyn MatchFunction {
        match self {
            AnyMatcher::Vector(m) => m,
            AnyMatcher::Field(m) => m,
        }
    }
}

impl MatchFunction for AnyMatcher {
    fn batch_match(&self, pairs: &[RecordPair<'_>]) -> erbound_core::Result<MatchBatch> {
        self.inner().batch_match(pairs)
    }

    fn precision(&self) -> Interval {
        self.inner().precision()
    }

    fn recall(&self) -> Interval {
        self.inner().recall()
    }

    fn class_balance(&self) -> f64 {
        self.inner().class_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldRule;
    use erbound_core::FeatureVector;
    use serde_json::json;

    fn report() -> ValidationReport {
        ValidationReport::new(
            Interval::new(0.9, 0.85, 0.95),
            Interval::new(0.8, 0.7, 0.9),
            0.3,
        )
    }

    fn is_sync<T: Sync>() {}

    #[test]
    fn test_matchers_are_sync() {
        is_sync::<VectorMatcher>();
        is_sync::<FieldMatcher>();
        is_sync::<AnyMatcher>();
    }

    #[test]
    fn test_vector_matcher() {
        let a = Record::new(1, FeatureVector::new(vec![1.0, 0.0]));
        let b = Record::new(2, FeatureVector::new(vec![0.9, 0.1]));
        let c = Record::new(3, FeatureVector::new(vec![0.0, 1.0]));
        let matcher = VectorMatcher::new(VectorMetric::Cosine, 0.5, report()).unwrap();

        let batch = matcher.batch_match(&[(&a, &b), (&a, &c)]).unwrap();
        assert_eq!(batch.matches, vec![true, false]);
        assert_eq!(batch.scores.len(), 2);
        assert_eq!(matcher.class_balance(), 0.3);
        assert_eq!(matcher.precision(), report().precision);
    }

    #[test]
    fn test_euclidean_metric() {
        let a = Record::new(1, FeatureVector::new(vec![0.0, 0.0]));
        let b = Record::new(2, FeatureVector::new(vec![3.0, 4.0]));
        assert!((VectorMetric::Euclidean.score(&a, &b) - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_field_matcher() {
        let rules = FieldRules::new(vec![
            FieldRule::text("name", 0.7),
            FieldRule::categorical("city", 0.3),
        ])
        .unwrap();
        let matcher = FieldMatcher::new(rules, 0.6, report()).unwrap();

        let a = Record::new(1, FeatureVector::default())
            .with_payload(json!({"name": "Grace Hopper", "city": "Arlington"}));
        let b = Record::new(2, FeatureVector::default())
            .with_payload(json!({"name": "Grace Hoper", "city": "Arlington"}));
        let c = Record::new(3, FeatureVector::default())
            .with_payload(json!({"name": "Alan Turing", "city": "London"}));
        let bare = Record::new(4, FeatureVector::default());

        let batch = matcher
            .batch_match(&[(&a, &b), (&a, &c), (&a, &bare)])
            .unwrap();
        assert_eq!(batch.matches, vec![true, false, false]);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            VectorMatcher::new(VectorMetric::Dot, f32::NAN, report()),
            Err(MatcherError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_description_deserialize_and_build() {
        let description: MatcherSpec = serde_json::from_value(json!({
            "type": "vector",
            "metric": "euclidean",
            "validation": {
                "precision": {"estimate": 0.9, "lower": 0.85, "upper": 0.95},
                "recall": {"estimate": 0.8, "lower": 0.7, "upper": 0.9},
                "class_balance": 0.3
            }
        }))
        .unwrap();

        let matcher = description.build().unwrap();
        match &matcher {
            AnyMatcher::Vector(m) => {
                assert_eq!(m.metric(), VectorMetric::Euclidean);
                assert_eq!(m.threshold(), DEFAULT_THRESHOLD);
            }
            AnyMatcher::Field(_) => panic!("expected vector matcher"),
        }
        assert_eq!(matcher.recall(), Interval::new(0.8, 0.7, 0.9));
    }
}
