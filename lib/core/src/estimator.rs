//! Pairwise precision lower bound
//!
//! Every pair of records placed in the same predicted cluster (a swoosh pair)
//! is re-scored by the match function. The fraction of swoosh pairs the match
//! function also accepts, times the match function's precision rebalanced to
//! the test class balance, lower-bounds the fraction of swoosh pairs that are
//! true positives: pairs the match function rejects are at best as likely to
//! be true positives as the pairs it accepts.

use crate::balance::rebalance_precision;
use crate::{
    Cluster, EstimatorConfig, Error, Interval, Labeling, MatchFunction, RecordPair, RecordStore,
    Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of the precision estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionBound {
    /// Lower bound on pairwise precision with its confidence bounds
    pub bound: Interval,
    /// Validation precision rebalanced to the test class balance
    pub rebalanced_precision: Interval,
    /// Swoosh pairs the match function accepts
    pub total_match_pairs: u64,
    /// Within-cluster pairs of the predicted labeling
    pub total_swoosh_pairs: u64,
}

/// Estimates the pairwise precision lower bound of a predicted labeling
#[derive(Debug, Clone, Default)]
pub struct PrecisionEstimator {
    config: EstimatorConfig,
}

impl PrecisionEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate<S, M>(
        &self,
        store: &S,
        predicted: &Labeling,
        matcher: &M,
        class_balance_test: f64,
    ) -> Result<PrecisionBound>
    where
        S: RecordStore + ?Sized,
        M: MatchFunction + ?Sized,
    {
        let clusters = predicted.clusters();

        let validation_precision = matcher.precision();
        let validation_balance = matcher.class_balance();
        debug!(
            precision = validation_precision.estimate,
            lower = validation_precision.lower,
            upper = validation_precision.upper,
            validation_balance,
            class_balance_test,
            "rebalancing validation precision"
        );
        let rebalanced_precision = validation_precision
            .try_map(|p| rebalance_precision(p, validation_balance, class_balance_test))?;
        info!(
            precision = rebalanced_precision.estimate,
            "expected test set match precision"
        );

        let mut total_swoosh_pairs = 0u64;
        let mut total_match_pairs = 0u64;
        for cluster in clusters.non_singletons() {
            let matched = self.count_cluster_matches(store, cluster, matcher)?;
            debug!(
                cluster = %cluster.id,
                swoosh_pairs = cluster.pair_count(),
                match_pairs = matched,
                "scored cluster"
            );
            total_swoosh_pairs += cluster.pair_count();
            total_match_pairs += matched;
        }

        let bound = if total_swoosh_pairs == 0 {
            Interval::exact(1.0)
        } else {
            let rate = total_match_pairs as f64 / total_swoosh_pairs as f64;
            rebalanced_precision.map(|p| p * rate)
        };

        info!(
            total_match_pairs,
            total_swoosh_pairs,
            precision_lower_bound = bound.estimate,
            "pairwise precision lower bound"
        );

        Ok(PrecisionBound {
            bound,
            rebalanced_precision,
            total_match_pairs,
            total_swoosh_pairs,
        })
    }

    /// Score all pairs of one cluster, chunked by `max_batch_pairs`
    fn count_cluster_matches<S, M>(&self, store: &S, cluster: &Cluster, matcher: &M) -> Result<u64>
    where
        S: RecordStore + ?Sized,
        M: MatchFunction + ?Sized,
    {
        let members = cluster
            .members
            .iter()
            .map(|id| store.require(id))
            .collect::<Result<Vec<_>>>()?;

        let expected = cluster.pair_count() as usize;
        let chunk = self.config.max_batch_pairs.unwrap_or(expected).max(1);

        let mut matched = 0u64;
        let mut batch: Vec<RecordPair<'_>> = Vec::with_capacity(chunk.min(expected));
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                batch.push((*a, *b));
                if batch.len() == chunk {
                    matched += score_batch(matcher, &batch)?;
                    batch.clear();
                }
            }
        }
        if !batch.is_empty() {
            matched += score_batch(matcher, &batch)?;
        }
        Ok(matched)
    }
}

fn score_batch<M>(matcher: &M, pairs: &[RecordPair<'_>]) -> Result<u64>
where
    M: MatchFunction + ?Sized,
{
    let batch = matcher.batch_match(pairs)?;
    if batch.matches.len() != pairs.len() {
        return Err(Error::MatchFunction(format!(
            "returned {} decisions for {} pairs",
            batch.matches.len(),
            pairs.len()
        )));
    }
    Ok(batch.match_count())
}
