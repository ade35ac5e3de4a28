//! JSON scenario files driving a sweep
//!
//! A scenario bundles the records, the match function description, the
//! predicted labelings for each operating point and either the test class
//! balance or a ground-truth labeling to compute it from.

use erbound_core::{
    pairwise_class_balance, Database, Error, EstimatorConfig, Labeling, MetricsSnapshot,
    OperatingPoint, PairwiseComparison, Record, Result, Sweep,
};
use erbound_similarity::MatcherSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub records: Vec<Record>,
    pub matcher: MatcherSpec,
    #[serde(default)]
    pub config: EstimatorConfig,
    /// Plug-in estimate of the test class balance
    #[serde(default)]
    pub class_balance_test: Option<f64>,
    /// True labels of the test records, when known
    #[serde(default)]
    pub ground_truth: Option<Labeling>,
    pub operating_points: Vec<OperatingPoint>,
}

/// Per-point output of [`Scenario::evaluate`]
#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corruption: Option<f64>,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth: Option<PairwiseComparison>,
    /// Why the bounds could not be evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why the labeling could not be compared with the ground truth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truth_error: Option<String>,
}

impl PointReport {
    pub fn is_failed(&self) -> bool {
        self.error.is_some() || self.truth_error.is_some()
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let scenario: Scenario = serde_json::from_str(&text)?;
        info!(
            path = %path.as_ref().display(),
            records = scenario.records.len(),
            points = scenario.operating_points.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// The explicit test class balance, or the one implied by the ground truth
    pub fn class_balance_test(&self) -> Result<f64> {
        match (self.class_balance_test, &self.ground_truth) {
            (Some(balance), _) => Ok(balance),
            (None, Some(truth)) => pairwise_class_balance(truth),
            (None, None) => Err(Error::InvalidConfig(
                "scenario needs class_balance_test or ground_truth".to_string(),
            )),
        }
    }

    /// Run the sweep; failed points are reported, not propagated
    pub fn evaluate(self) -> Result<Vec<PointReport>> {
        let class_balance_test = self.class_balance_test()?;
        info!(class_balance_test, "test class balance");

        let db = Database::from_records(self.records)?;
        let matcher = self.matcher.build()?;
        let sweep = Sweep::new(self.config)?;
        let outcomes = sweep.run(&db, &self.operating_points, &matcher, class_balance_test);

        let reports: Vec<PointReport> = outcomes
            .into_iter()
            .zip(&self.operating_points)
            .map(|(outcome, point)| {
                let (truth, truth_error) = match &self.ground_truth {
                    Some(truth) => match PairwiseComparison::compare(truth, &point.labeling) {
                        Ok(comparison) => (Some(comparison), None),
                        Err(e) => {
                            warn!(
                                threshold = point.threshold,
                                error = %e,
                                "ground truth comparison skipped"
                            );
                            (None, Some(e.to_string()))
                        }
                    },
                    None => (None, None),
                };
                let (metrics, error) = match outcome.result {
                    Ok(snapshot) => (Some(snapshot), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                PointReport {
                    corruption: outcome.corruption,
                    threshold: outcome.threshold,
                    metrics,
                    truth,
                    error,
                    truth_error,
                }
            })
            .collect();
        Ok(reports)
    }
}
