//! Vector types for the combined text + numeric feature space.

use serde::{Deserialize, Serialize};

/// A sparse vector with strictly increasing indices and no explicit zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs in any order. Repeated indices are summed.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(idx, _)| idx);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            match indices.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(idx);
                    values.push(value);
                }
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        Self { indices, values }
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored (non-zero) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest stored index, if any.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Scale to unit L2 norm. A zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm_squared().sqrt();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// A catalog row in feature space: sparse text block followed by the
/// dense scaled numeric block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub text: SparseVector,
    pub numeric: Vec<f64>,
}

impl FeatureVector {
    #[must_use]
    pub fn new(text: SparseVector, numeric: Vec<f64>) -> Self {
        Self { text, numeric }
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.text.dot(&other.text)
            + self
                .numeric
                .iter()
                .zip(&other.numeric)
                .map(|(a, b)| a * b)
                .sum::<f64>()
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        (self.text.norm_squared() + self.numeric.iter().map(|v| v * v).sum::<f64>()).sqrt()
    }

    /// Cosine distance `1 - cos(a, b)`, in `[0, 2]`.
    ///
    /// A zero vector is at distance 1 from everything.
    #[must_use]
    pub fn cosine_distance(&self, other: &Self) -> f64 {
        cosine_distance_with_norms(self, self.norm(), other, other.norm())
    }
}

/// Cosine distance with precomputed norms.
pub(crate) fn cosine_distance_with_norms(
    a: &FeatureVector,
    norm_a: f64,
    b: &FeatureVector,
    norm_b: f64,
) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - a.dot(b) / (norm_a * norm_b)).clamp(0.0, 2.0)
}
