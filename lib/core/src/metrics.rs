//! Metrics snapshot for one operating point

use crate::balance::rebalance_recall;
use crate::{
    EstimatorConfig, Interval, Labeling, MatchFunction, PrecisionEstimator, RecordStore, Result,
};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Harmonic mean of two bounds, 0.0 when either is exactly zero
pub fn f1_lower_bound(precision: f64, recall: f64) -> f64 {
    if precision == 0.0 || recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Lower bounds on pairwise precision, recall and F1 of a predicted labeling.
///
/// Built once by [`MetricsSnapshot::evaluate`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    precision_lower_bound: Interval,
    recall_lower_bound: Interval,
    f1_lower_bound: f64,
    total_match_pairs: u64,
    total_swoosh_pairs: u64,
}

impl MetricsSnapshot {
    /// Evaluate the bounds for `predicted` against `store` using `matcher`,
    /// with `class_balance_test` as the (estimated) test class balance.
    pub fn evaluate<S, M>(
        store: &S,
        predicted: &Labeling,
        matcher: &M,
        class_balance_test: f64,
        config: &EstimatorConfig,
    ) -> Result<Self>
    where
        S: RecordStore + ?Sized,
        M: MatchFunction + ?Sized,
    {
        info!(records = predicted.len(), "evaluating metric lower bounds");

        let validation_balance = matcher.class_balance();
        let recall = matcher.recall();
        recall.validate("recall")?;
        let recall_lower_bound = recall.map(|r| rebalance_recall(r, validation_balance, class_balance_test));

        let precision = PrecisionEstimator::new(config.clone())?.estimate(
            store,
            predicted,
            matcher,
            class_balance_test,
        )?;

        let snapshot = Self::from_parts(
            precision.bound,
            recall_lower_bound,
            precision.total_match_pairs,
            precision.total_swoosh_pairs,
        );
        info!(
            precision = snapshot.precision_lower_bound.estimate,
            recall = snapshot.recall_lower_bound.estimate,
            f1 = snapshot.f1_lower_bound,
            "metric lower bounds evaluated"
        );
        Ok(snapshot)
    }

    /// Assemble a snapshot from already computed bounds
    pub fn from_parts(
        precision_lower_bound: Interval,
        recall_lower_bound: Interval,
        total_match_pairs: u64,
        total_swoosh_pairs: u64,
    ) -> Self {
        Self {
            precision_lower_bound,
            recall_lower_bound,
            f1_lower_bound: f1_lower_bound(
                precision_lower_bound.estimate,
                recall_lower_bound.estimate,
            ),
            total_match_pairs,
            total_swoosh_pairs,
        }
    }

    pub fn precision_lower_bound(&self) -> f64 {
        self.precision_lower_bound.estimate
    }

    /// Precision bound with its lower and upper confidence values
    pub fn precision_interval(&self) -> Interval {
        self.precision_lower_bound
    }

    pub fn recall_lower_bound(&self) -> f64 {
        self.recall_lower_bound.estimate
    }

    /// Recall bound with its lower and upper confidence values
    pub fn recall_interval(&self) -> Interval {
        self.recall_lower_bound
    }

    pub fn f1_lower_bound(&self) -> f64 {
        self.f1_lower_bound
    }

    pub fn total_match_pairs(&self) -> u64 {
        self.total_match_pairs
    }

    pub fn total_swoosh_pairs(&self) -> u64 {
        self.total_swoosh_pairs
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.precision_lower_bound;
        let r = self.recall_lower_bound;
        writeln!(f, "Pairwise precision lower bound: {:.4}", p.estimate)?;
        writeln!(f, "    (lower confidence: {:.4})", p.lower)?;
        writeln!(f, "    (upper confidence: {:.4})", p.upper)?;
        writeln!(f, "Pairwise recall lower bound: {:.4}", r.estimate)?;
        writeln!(f, "    (lower confidence: {:.4})", r.lower)?;
        writeln!(f, "    (upper confidence: {:.4})", r.upper)?;
        writeln!(f, "Pairwise F1 lower bound: {:.4}", self.f1_lower_bound)?;
        write!(
            f,
            "Match pairs / swoosh pairs: {} / {}",
            self.total_match_pairs, self.total_swoosh_pairs
        )
    }
}
