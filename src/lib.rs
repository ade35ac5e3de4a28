//! # erbound
//!
//! Lower bounds on the pairwise precision, recall and F1 of an
//! entity-resolution clustering, estimated without test-set ground truth.
//!
//! Given a match function validated elsewhere (precision and recall with
//! confidence bounds, plus the class balance of its validation data) and a
//! predicted clustering, erbound rebalances the match function's precision to
//! the test population's class balance and re-scores every within-cluster
//! pair to bound the clustering's precision.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! erbound evaluate --scenario scenario.json --format json
//! erbound balance --labels truth.json
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use erbound::prelude::*;
//!
//! let scenario = Scenario::load("scenario.json").unwrap();
//! for report in scenario.evaluate().unwrap() {
//!     if let Some(metrics) = report.metrics {
//!         println!("threshold {}:\n{}", report.threshold, metrics);
//!     }
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `erbound-core` - class balance, rebalancing, precision estimator,
//!   metrics snapshot and sweeps
//! - `erbound-similarity` - vector and field-rule match functions

pub mod scenario;

// Re-export core types
pub use erbound_core::{
    failures, pairwise_class_balance, rebalance_precision, rebalance_recall, successes, Database,
    Error, EstimatorConfig, FeatureVector, Interval, Labeling, MatchBatch, MatchFunction,
    MetricsSnapshot, OperatingPoint, PairwiseComparison, PrecisionEstimator, Record, RecordId,
    RecordPair, RecordStore, Result, Sweep, SweepOutcome,
};

// Re-export match functions
pub use erbound_similarity::{
    AnyMatcher, FieldMatcher, FieldRule, FieldRules, MatcherSpec, ValidationReport,
    VectorMatcher, VectorMetric,
};

pub use scenario::{PointReport, Scenario};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        pairwise_class_balance, Database, Error, EstimatorConfig, Interval, Labeling,
        MatchFunction, MetricsSnapshot, OperatingPoint, PointReport, Record, RecordId, Result,
        Scenario, Sweep, ValidationReport,
    };
}
