use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for metric estimation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Upper bound on pairs per `batch_match` call.
    /// `None` sends each cluster's pairs as one batch.
    pub max_batch_pairs: Option<usize>,
    /// Evaluate sweep points on the rayon thread pool
    pub parallel: bool,
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_pairs == Some(0) {
            return Err(Error::InvalidConfig(
                "max_batch_pairs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_max_batch_pairs(mut self, max_batch_pairs: usize) -> Self {
        self.max_batch_pairs = Some(max_batch_pairs);
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
