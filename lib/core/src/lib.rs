//! # erbound Core
//!
//! Semi-supervised lower bounds on the pairwise precision, recall and F1 of
//! an entity-resolution clustering, computed without test-set ground truth.
//!
//! - [`pairwise_class_balance`] - fraction of positive pairs in a labeling
//! - [`rebalance_precision`] / [`rebalance_recall`] - move match-function
//!   metrics from the validation class balance to the test class balance
//! - [`PrecisionEstimator`] - re-scores every within-cluster pair with the
//!   match function to lower-bound precision
//! - [`MetricsSnapshot`] - precision, recall and F1 bounds for one
//!   operating point
//! - [`Sweep`] - many operating points, optionally in parallel
//!
//! ## Example
//!
//! ```rust
//! use erbound_core::{
//!     Database, EstimatorConfig, FeatureVector, Interval, Labeling, MatchBatch,
//!     MatchFunction, MetricsSnapshot, Record, RecordPair, Result,
//! };
//!
//! struct Accept;
//!
//! impl MatchFunction for Accept {
//!     fn batch_match(&self, pairs: &[RecordPair<'_>]) -> Result<MatchBatch> {
//!         Ok(MatchBatch::new(vec![true; pairs.len()], Vec::new()))
//!     }
//!     fn precision(&self) -> Interval { Interval::new(0.9, 0.85, 0.95) }
//!     fn recall(&self) -> Interval { Interval::new(0.8, 0.75, 0.85) }
//!     fn class_balance(&self) -> f64 { 0.5 }
//! }
//!
//! let db = Database::from_records(
//!     (1..=3u64).map(|i| Record::new(i, FeatureVector::new(vec![i as f32]))),
//! ).unwrap();
//! let predicted = Labeling::from_pairs(vec![(1u64, 0u64), (2, 0), (3, 1)]).unwrap();
//!
//! let snapshot =
//!     MetricsSnapshot::evaluate(&db, &predicted, &Accept, 0.5, &EstimatorConfig::default())
//!         .unwrap();
//! assert_eq!(snapshot.total_swoosh_pairs(), 1);
//! assert!((snapshot.precision_lower_bound() - 0.9).abs() < 1e-12);
//! ```

pub mod balance;
pub mod comparison;
pub mod config;
pub mod error;
pub mod estimator;
pub mod features;
pub mod labeling;
pub mod matcher;
pub mod metrics;
pub mod record;
pub mod sweep;

pub use balance::{pairwise_class_balance, rebalance_precision, rebalance_recall};
pub use comparison::PairwiseComparison;
pub use config::EstimatorConfig;
pub use error::{Error, Result};
pub use estimator::{PrecisionBound, PrecisionEstimator};
pub use features::FeatureVector;
pub use labeling::{pair_count, Cluster, ClusterId, ClusterSet, Labeling};
pub use matcher::{Interval, MatchBatch, MatchFunction, RecordPair};
pub use metrics::{f1_lower_bound, MetricsSnapshot};
pub use record::{Database, Record, RecordId, RecordStore};
pub use sweep::{failures, successes, OperatingPoint, Sweep, SweepOutcome};
