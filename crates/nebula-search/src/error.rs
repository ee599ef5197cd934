//! Error types for matching, feature building and recommendation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// What a free-text query was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Track,
    Artist,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Track => write!(f, "Song"),
            Self::Artist => write!(f, "Artist"),
        }
    }
}

/// Errors raised by the recommendation core.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No candidate scored at or above the match threshold.
    #[error("{kind} '{query}' not found")]
    NotFound {
        kind: QueryKind,
        query: String,
        best_score: f64,
    },

    /// The loaded artifacts do not fit together.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required artifact file is absent.
    #[error("missing artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// Training input cannot be fitted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] nebula_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Returns `true` when the query did not resolve to a catalog entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Highest score any candidate reached for an unresolved query.
    pub fn best_score(&self) -> Option<f64> {
        match self {
            Self::NotFound { best_score, .. } => Some(*best_score),
            _ => None,
        }
    }

    /// Returns `true` for deployment defects: missing or mismatched artifacts.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingArtifact { .. })
    }
}

/// Convenience alias for recommendation results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
