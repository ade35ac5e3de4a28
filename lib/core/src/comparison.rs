//! Exact pairwise metrics against a ground-truth labeling
//!
//! Only usable when the truth is known (synthetic or fully labeled data); it
//! lets a sweep report how tight the bounds are.

use crate::labeling::pair_count;
use crate::metrics::f1_lower_bound;
use crate::{ClusterId, Error, Labeling, Result};
use ahash::AHashMap;
use serde::Serialize;

/// Pair counts of a predicted labeling compared with the truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairwiseComparison {
    /// Pairs co-clustered in both labelings
    pub true_positive_pairs: u64,
    /// Pairs co-clustered in the predicted labeling
    pub predicted_pairs: u64,
    /// Pairs co-clustered in the truth
    pub truth_pairs: u64,
}

impl PairwiseComparison {
    /// Compare labelings over the same set of records
    pub fn compare(truth: &Labeling, predicted: &Labeling) -> Result<Self> {
        let mut contingency: AHashMap<(ClusterId, ClusterId), usize> = AHashMap::new();
        for (record, predicted_cluster) in predicted.iter() {
            let truth_cluster = truth
                .cluster_of(record)
                .ok_or_else(|| Error::UnknownRecord(record.to_string()))?;
            *contingency.entry((truth_cluster, predicted_cluster)).or_insert(0) += 1;
        }
        // every predicted record is in the truth, so a size difference means
        // the truth labels records the prediction lacks
        if truth.len() != predicted.len() {
            let missing = truth
                .iter()
                .find(|(record, _)| predicted.cluster_of(record).is_none());
            if let Some((record, _)) = missing {
                return Err(Error::UnknownRecord(record.to_string()));
            }
        }

        Ok(Self {
            true_positive_pairs: contingency.values().map(|n| pair_count(*n)).sum(),
            predicted_pairs: predicted.clusters().intra_pair_count(),
            truth_pairs: truth.clusters().intra_pair_count(),
        })
    }

    /// Pairwise precision, 1.0 when nothing is predicted
    pub fn precision(&self) -> f64 {
        if self.predicted_pairs == 0 {
            1.0
        } else {
            self.true_positive_pairs as f64 / self.predicted_pairs as f64
        }
    }

    /// Pairwise recall, 1.0 when the truth has no pairs
    pub fn recall(&self) -> f64 {
        if self.truth_pairs == 0 {
            1.0
        } else {
            self.true_positive_pairs as f64 / self.truth_pairs as f64
        }
    }

    pub fn f1(&self) -> f64 {
        f1_lower_bound(self.precision(), self.recall())
    }
}
