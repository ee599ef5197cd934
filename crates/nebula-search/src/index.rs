//! Brute-force cosine nearest-neighbor index over catalog feature vectors.

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::vector::{cosine_distance_with_norms, FeatureVector};

/// Default number of neighbors returned when a query does not say.
pub const DEFAULT_NEIGHBORS: usize = 11;

/// One neighbor of a query vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Catalog position of the neighbor.
    pub row: usize,
    /// Cosine distance from the query.
    pub distance: f64,
}

/// Holds every catalog vector, in catalog order.
///
/// Row `i` of the index is catalog position `i`. Queries scan every row, so
/// results are exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborIndex {
    vectors: Vec<FeatureVector>,
    #[serde(skip)]
    norms: Vec<f64>,
    text_width: usize,
    numeric_width: usize,
    default_neighbors: usize,
}

impl NeighborIndex {
    /// Index `vectors`. `text_width` is the vocabulary size the text blocks
    /// were produced with.
    ///
    /// # Errors
    /// Fails on an empty set, a zero neighbor count, or vectors whose
    /// numeric widths disagree or whose text indices exceed `text_width`.
    pub fn fit(
        vectors: Vec<FeatureVector>,
        text_width: usize,
        default_neighbors: usize,
    ) -> SearchResult<Self> {
        if default_neighbors == 0 {
            return Err(SearchError::InvalidInput(
                "neighbor count must be at least 1".to_string(),
            ));
        }
        let Some(first) = vectors.first() else {
            return Err(SearchError::InvalidInput(
                "cannot index an empty catalog".to_string(),
            ));
        };
        let numeric_width = first.numeric.len();

        let mut index = Self {
            vectors,
            norms: Vec::new(),
            text_width,
            numeric_width,
            default_neighbors,
        };
        index.validate()?;
        index.compute_norms();
        log::debug!(
            "Indexed {} vectors ({} text + {} numeric columns)",
            index.len(),
            text_width,
            numeric_width
        );
        Ok(index)
    }

    fn validate(&self) -> SearchResult<()> {
        for (row, v) in self.vectors.iter().enumerate() {
            self.check_shape(v)
                .map_err(|e| SearchError::Config(format!("indexed row {row}: {e}")))?;
        }
        Ok(())
    }

    fn check_shape(&self, v: &FeatureVector) -> Result<(), String> {
        if v.numeric.len() != self.numeric_width {
            return Err(format!(
                "numeric width {} does not match index width {}",
                v.numeric.len(),
                self.numeric_width
            ));
        }
        if let Some(max) = v.text.max_index() {
            if max >= self.text_width {
                return Err(format!(
                    "text index {max} outside vocabulary of {}",
                    self.text_width
                ));
            }
        }
        Ok(())
    }

    fn compute_norms(&mut self) {
        self.norms = self.vectors.iter().map(FeatureVector::norm).collect();
    }

    /// Recompute cached norms after deserialization and re-check shapes.
    ///
    /// # Errors
    /// Returns a configuration error if the stored vectors are inconsistent.
    pub fn restore(mut self) -> SearchResult<Self> {
        if self.vectors.is_empty() || self.default_neighbors == 0 {
            return Err(SearchError::Config(
                "neighbor index artifact is empty".to_string(),
            ));
        }
        self.validate()?;
        self.compute_norms();
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub fn text_width(&self) -> usize {
        self.text_width
    }

    #[must_use]
    pub fn numeric_width(&self) -> usize {
        self.numeric_width
    }

    /// Total dimensionality of the feature space.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text_width + self.numeric_width
    }

    #[must_use]
    pub fn default_neighbors(&self) -> usize {
        self.default_neighbors
    }

    /// The stored vector at `row`.
    #[must_use]
    pub fn vector(&self, row: usize) -> Option<&FeatureVector> {
        self.vectors.get(row)
    }

    /// The `k` nearest rows to `query` (the index default when `None`),
    /// ascending by distance with ties broken by lower row. `k` is capped at
    /// the number of indexed rows.
    ///
    /// # Errors
    /// Fails when `k` is zero or `query` does not fit the index's shape.
    pub fn kneighbors(&self, query: &FeatureVector, k: Option<usize>) -> SearchResult<Vec<Neighbor>> {
        let k = k.unwrap_or(self.default_neighbors);
        if k == 0 {
            return Err(SearchError::InvalidInput(
                "neighbor count must be at least 1".to_string(),
            ));
        }
        self.check_shape(query).map_err(SearchError::InvalidInput)?;

        let query_norm = query.norm();
        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(row, (v, &norm))| Neighbor {
                row,
                distance: cosine_distance_with_norms(query, query_norm, v, norm),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.row.cmp(&b.row))
        });
        neighbors.truncate(k.min(self.len()));
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::SparseVector;

    fn vector(text: &[(usize, f64)], numeric: &[f64]) -> FeatureVector {
        FeatureVector::new(SparseVector::from_pairs(text.to_vec()), numeric.to_vec())
    }

    fn small_index() -> NeighborIndex {
        NeighborIndex::fit(
            vec![
                vector(&[(0, 1.0)], &[1.0, 0.0]),
                vector(&[(0, 1.0)], &[0.9, 0.1]),
                vector(&[(1, 1.0)], &[-1.0, 0.0]),
                vector(&[(0, 1.0)], &[1.0, 0.0]),
            ],
            2,
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_query_row_is_its_own_nearest() {
        let index = small_index();
        let query = index.vector(2).unwrap().clone();
        let result = index.kneighbors(&query, Some(1)).unwrap();
        assert_eq!(result[0].row, 2);
        assert!(result[0].distance.abs() < 1e-12);
    }

    #[test]
    fn test_ties_broken_by_row() {
        let index = small_index();
        let query = index.vector(3).unwrap().clone();
        let result = index.kneighbors(&query, Some(2)).unwrap();
        // rows 0 and 3 are identical
        assert_eq!(result[0].row, 0);
        assert_eq!(result[1].row, 3);
    }

    #[test]
    fn test_distances_ascending() {
        let index = small_index();
        let result = index.kneighbors(index.vector(0).unwrap(), Some(4)).unwrap();
        for pair in result.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_default_and_capped_k() {
        let index = small_index();
        let query = index.vector(0).unwrap();
        assert_eq!(index.kneighbors(query, None).unwrap().len(), 3);
        assert_eq!(index.kneighbors(query, Some(100)).unwrap().len(), 4);
    }

    #[test]
    fn test_zero_k_rejected() {
        let index = small_index();
        assert!(index.kneighbors(index.vector(0).unwrap(), Some(0)).is_err());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let index = small_index();
        assert!(index.kneighbors(&vector(&[], &[1.0]), None).is_err());
        assert!(index.kneighbors(&vector(&[(5, 1.0)], &[1.0, 0.0]), None).is_err());
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert!(NeighborIndex::fit(Vec::new(), 2, 3).is_err());
    }

    #[test]
    fn test_restore_after_serde() {
        let index = small_index();
        let json = serde_json::to_string(&index).unwrap();
        let restored: NeighborIndex = serde_json::from_str(&json).unwrap();
        let restored = restored.restore().unwrap();

        let query = index.vector(1).unwrap();
        assert_eq!(
            index.kneighbors(query, None).unwrap(),
            restored.kneighbors(query, None).unwrap()
        );
    }
}
