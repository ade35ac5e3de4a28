//! Evaluation over many operating points
//!
//! Each (corruption level, threshold) point is evaluated independently. A
//! failing point keeps its error in its outcome and the remaining points are
//! still evaluated.

use crate::{EstimatorConfig, Labeling, MatchFunction, MetricsSnapshot, RecordStore, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One predicted labeling produced at a given threshold (and corruption level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corruption: Option<f64>,
    pub threshold: f64,
    pub labeling: Labeling,
}

impl OperatingPoint {
    pub fn new(threshold: f64, labeling: Labeling) -> Self {
        Self {
            corruption: None,
            threshold,
            labeling,
        }
    }

    #[must_use]
    pub fn with_corruption(mut self, corruption: f64) -> Self {
        self.corruption = Some(corruption);
        self
    }
}

/// Result for one operating point
#[derive(Debug)]
pub struct SweepOutcome {
    pub corruption: Option<f64>,
    pub threshold: f64,
    pub result: Result<MetricsSnapshot>,
}

impl SweepOutcome {
    pub fn snapshot(&self) -> Option<&MetricsSnapshot> {
        self.result.as_ref().ok()
    }
}

/// Runs [`MetricsSnapshot::evaluate`] over a list of operating points
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    config: EstimatorConfig,
}

impl Sweep {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Evaluate every point, on the rayon pool when `parallel` is set.
    /// Outcomes keep the order of `points`.
    pub fn run<S, M>(
        &self,
        store: &S,
        points: &[OperatingPoint],
        matcher: &M,
        class_balance_test: f64,
    ) -> Vec<SweepOutcome>
    where
        S: RecordStore + Sync + ?Sized,
        M: MatchFunction + Sync + ?Sized,
    {
        if !self.config.parallel {
            info!(points = points.len(), "running sweep");
            return points
                .iter()
                .map(|point| self.evaluate_point(store, point, matcher, class_balance_test))
                .collect();
        }

        info!(
            points = points.len(),
            threads = rayon::current_num_threads(),
            "running sweep in parallel"
        );
        points
            .par_iter()
            .map(|point| self.evaluate_point(store, point, matcher, class_balance_test))
            .collect()
    }

    fn evaluate_point<S, M>(
        &self,
        store: &S,
        point: &OperatingPoint,
        matcher: &M,
        class_balance_test: f64,
    ) -> SweepOutcome
    where
        S: RecordStore + ?Sized,
        M: MatchFunction + ?Sized,
    {
        let result = MetricsSnapshot::evaluate(
            store,
            &point.labeling,
            matcher,
            class_balance_test,
            &self.config,
        );
        if let Err(ref e) = result {
            warn!(
                threshold = point.threshold,
                corruption = ?point.corruption,
                error = %e,
                "operating point skipped"
            );
        }
        SweepOutcome {
            corruption: point.corruption,
            threshold: point.threshold,
            result,
        }
    }
}

/// Number of points that produced a snapshot
pub fn successes(outcomes: &[SweepOutcome]) -> usize {
    outcomes.iter().filter(|o| o.result.is_ok()).count()
}

/// Number of points whose evaluation failed
pub fn failures(outcomes: &[SweepOutcome]) -> usize {
    outcomes.len() - successes(outcomes)
}
