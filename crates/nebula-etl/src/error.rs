//! Training error types.

use std::path::PathBuf;

use nebula_search::SearchError;
use thiserror::Error;

/// Errors that can occur while building the model artifacts.
#[derive(Debug, Error)]
pub enum TrainError {
    /// The raw catalog could not be read or parsed as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The raw catalog lacks a column the pipeline needs.
    #[error("raw catalog is missing column '{0}'")]
    MissingColumn(String),

    /// A present cell holds a value of the wrong shape.
    #[error("line {line}: invalid {column} value '{value}'")]
    InvalidData {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Nothing survived cleaning.
    #[error("cleaned catalog is empty; nothing to train on")]
    EmptyCatalog,

    /// Staged artifacts are incomplete at publish time.
    #[error("staged artifact missing: {}", path.display())]
    Unstaged { path: PathBuf },

    /// An error propagated from the catalog layer.
    #[error("catalog error: {0}")]
    Catalog(#[from] nebula_core::Error),

    /// An error propagated from fitting features or the index.
    #[error("fit error: {0}")]
    Fit(#[from] SearchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for training results.
pub type TrainResult<T> = std::result::Result<T, TrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_data_names_line_and_column() {
        let err = TrainError::InvalidData {
            line: 7,
            column: "explicit",
            value: "maybe".to_string(),
        };
        assert_eq!(err.to_string(), "line 7: invalid explicit value 'maybe'");
    }
}
