use serde::{Deserialize, Serialize};

/// Dense feature vector attached to a record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Dot product, 0.0 on dimension mismatch
    #[inline]
    pub fn dot(&self, other: &FeatureVector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity in [-1, 1]; 0.0 when either side has zero norm
    #[inline]
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot(other) / (norm_a * norm_b)
    }

    /// Euclidean distance, infinite on dimension mismatch
    #[inline]
    pub fn l2_distance(&self, other: &FeatureVector) -> f32 {
        if self.dim() != other.dim() {
            return f32::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = FeatureVector::new(vec![1.0, 0.0]);
        let v2 = FeatureVector::new(vec![2.0, 0.0]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = FeatureVector::new(vec![0.0, 1.0]);
        assert!(v1.cosine_similarity(&v3).abs() < 1e-6);

        let zero = FeatureVector::new(vec![0.0, 0.0]);
        assert_eq!(v1.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_l2_distance() {
        let v1 = FeatureVector::new(vec![0.0, 0.0]);
        let v2 = FeatureVector::new(vec![3.0, 4.0]);
        assert!((v1.l2_distance(&v2) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = FeatureVector::new(vec![1.0]);
        let v2 = FeatureVector::new(vec![1.0, 2.0]);
        assert_eq!(v1.dot(&v2), 0.0);
        assert_eq!(v1.l2_distance(&v2), f32::INFINITY);
    }
}
