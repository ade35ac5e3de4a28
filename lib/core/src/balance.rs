//! Class balance and rebalancing of match-function metrics
//!
//! The class balance of a population is the fraction of all unordered record
//! pairs that are true positives (same entity).
//!
//! # Modelling assumption
//!
//! Rebalancing assumes the match function's acceptance rates on true-positive
//! pairs and on true-negative pairs carry over unchanged from the validation
//! data to the test data; only the mixture of positives and negatives differs.
//! This is an assumption about the match function, not a derived fact. Under
//! it recall is unchanged by a shift in class balance and precision follows
//! the closed form in [`rebalance_precision`].

use crate::error::check_probability;
use crate::labeling::pair_count;
use crate::{Error, Labeling, Result};
use tracing::debug;

/// Fraction of same-cluster record pairs over all record pairs of `labeling`.
///
/// Fails with [`Error::DegenerateInput`] for fewer than two records.
pub fn pairwise_class_balance(labeling: &Labeling) -> Result<f64> {
    let records = labeling.len();
    if records < 2 {
        return Err(Error::DegenerateInput { records });
    }

    let total_pairs = pair_count(records);
    let positive_pairs = labeling.clusters().intra_pair_count();
    let balance = positive_pairs as f64 / total_pairs as f64;

    debug!(
        records,
        total_pairs, positive_pairs, balance, "computed pairwise class balance"
    );
    Ok(balance)
}

/// Expected precision at class balance `balance_2` given `precision_1`
/// measured at class balance `balance_1`:
///
/// ```text
/// p2 = (1 - b1) * b2 * p1 / (b1 - b1*b2 - b1*p1 + b2*p1)
/// ```
///
/// Equal balances return `precision_1` unchanged. A non-positive denominator
/// is reported as [`Error::Rebalance`].
pub fn rebalance_precision(precision_1: f64, balance_1: f64, balance_2: f64) -> Result<f64> {
    let p1 = check_probability("precision", precision_1)?;
    let b1 = check_probability("source class balance", balance_1)?;
    let b2 = check_probability("target class balance", balance_2)?;

    if b1 == b2 {
        return Ok(p1);
    }

    let denominator = b1 - b1 * b2 - b1 * p1 + b2 * p1;
    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(Error::Rebalance {
            precision: p1,
            from: b1,
            to: b2,
            denominator,
        });
    }

    // Numerator never exceeds the denominator; clamp rounding noise.
    Ok(((1.0 - b1) * b2 * p1 / denominator).min(1.0))
}

/// Recall at class balance `balance_2` given `recall_1` at `balance_1`.
///
/// Recall only depends on the true-positive acceptance rate, which is held
/// fixed across datasets, so the value is returned unchanged.
pub fn rebalance_recall(recall_1: f64, _balance_1: f64, _balance_2: f64) -> f64 {
    recall_1
}
