//! # erbound Similarity
//!
//! Concrete pairwise match functions for the erbound estimator.
//!
//! Each matcher scores a record pair, accepts it at a fixed threshold and
//! carries the [`ValidationReport`] (precision, recall and class balance)
//! measured for it on a labeled validation set. Training and validating the
//! matcher happen elsewhere; the report is an input.
//!
//! - [`VectorMatcher`] - cosine, euclidean or dot similarity of feature vectors
//! - [`FieldMatcher`] - weighted per-field similarity of JSON payloads
//! - [`MatcherSpec`] - serde description that builds either one
//!
//! ## Example
//!
//! ```rust
//! use erbound_core::{Interval, MatchFunction};
//! use erbound_similarity::{FieldMatcher, FieldRule, FieldRules, ValidationReport};
//!
//! let rules = FieldRules::new(vec![
//!     FieldRule::text("name", 0.6),
//!     FieldRule::categorical("zip", 0.4),
//! ]).unwrap();
//! let report = ValidationReport::new(
//!     Interval::new(0.92, 0.88, 0.95),
//!     Interval::new(0.81, 0.76, 0.86),
//!     0.5,
//! );
//! let matcher = FieldMatcher::new(rules, 0.5, report).unwrap();
//! assert_eq!(matcher.class_balance(), 0.5);
//! ```

pub mod distance;
pub mod matchers;
pub mod report;
pub mod rules;

pub use distance::Comparison;
pub use matchers::{
    AnyMatcher, FieldMatcher, MatcherSpec, VectorMatcher, VectorMetric, DEFAULT_THRESHOLD,
};
pub use report::{MatcherError, ValidationReport};
pub use rules::{FieldKind, FieldRule, FieldRules};
