//! Zero-mean, unit-variance scaling of numeric columns.

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// Standardizes each column with the mean and population standard
/// deviation learned at fit time. Zero-variance columns are only centered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.mean.is_empty()
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Learn per-column statistics.
    ///
    /// # Errors
    /// Fails on zero rows, zero columns, or ragged rows.
    pub fn fit<R: AsRef<[f64]>>(&mut self, rows: &[R]) -> SearchResult<()> {
        let Some(first) = rows.first() else {
            return Err(SearchError::InvalidInput(
                "cannot fit scaler with zero samples".to_string(),
            ));
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(SearchError::InvalidInput(
                "cannot fit scaler with zero columns".to_string(),
            ));
        }
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(SearchError::InvalidInput(
                "scaler rows have differing widths".to_string(),
            ));
        }

        #[allow(clippy::cast_precision_loss)]
        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row.as_ref()) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut scale = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in scale.iter_mut().zip(row.as_ref()).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        for s in &mut scale {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        self.mean = mean;
        self.scale = scale;
        Ok(())
    }

    /// Standardize one row.
    ///
    /// # Errors
    /// Fails with a configuration error when unfitted or when `row` has the
    /// wrong width.
    pub fn transform(&self, row: &[f64]) -> SearchResult<Vec<f64>> {
        if !self.is_fitted() {
            return Err(SearchError::Config("numeric scaler is not fitted".to_string()));
        }
        if row.len() != self.width() {
            return Err(SearchError::Config(format!(
                "numeric scaler expects {} columns, got {}",
                self.width(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_learns_mean_and_population_std() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&[[1.0, 10.0], [3.0, 10.0]]).unwrap();

        assert_eq!(scaler.mean(), &[2.0, 10.0]);
        assert_eq!(scaler.scale(), &[1.0, 1.0]);
    }

    #[test]
    fn test_transformed_columns_are_standardized() {
        let rows = [[1.0, 100.0], [2.0, 200.0], [3.0, 600.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&rows).unwrap();

        let scaled: Vec<Vec<f64>> = rows.iter().map(|r| scaler.transform(r).unwrap()).collect();
        for col in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[col]).sum::<f64>() / 3.0;
            let var: f64 = scaled.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-9);
            assert!((var - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_column_is_centered_only() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&[[5.0], [5.0]]).unwrap();
        assert_eq!(scaler.transform(&[7.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_width_mismatch_is_config_error() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&[[1.0, 2.0]]).unwrap();
        assert!(scaler.transform(&[1.0]).unwrap_err().is_config());
    }

    #[test]
    fn test_large_counts_keep_unit_differences() {
        // Follower counts near 1e8 sit where f32 spacing is 8.
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = [100_000_001.0_f64 as f32, 100_000_002.0_f64 as f32];
        assert_eq!(narrowed[0], narrowed[1]);

        let rows = [[100_000_001.0], [100_000_002.0], [100_000_003.0]];
        let mut scaler = StandardScaler::new();
        scaler.fit(&rows).unwrap();

        assert_eq!(scaler.mean(), &[100_000_002.0]);
        let scaled: Vec<f64> = rows.iter().map(|r| scaler.transform(r).unwrap()[0]).collect();
        assert!(scaled[0] < scaled[1] && scaled[1] < scaled[2]);
        assert!(scaled[1].abs() < 1e-9);
        assert!((scaled[2] - 1.5_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_fit_rejects_empty_and_ragged() {
        let mut scaler = StandardScaler::new();
        assert!(scaler.fit::<[f64; 2]>(&[]).is_err());
        assert!(scaler.fit(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
