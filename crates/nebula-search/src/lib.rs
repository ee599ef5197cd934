//! Recommendation core for nebula-sound.
//!
//! Resolves free-text names against the catalog with a fuzzy matcher,
//! embeds catalog rows as TF-IDF text plus standardized numeric features,
//! and answers nearest-neighbor queries over those vectors by cosine
//! distance. [`Recommender`] ties the fitted pieces together.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod artifacts;
pub mod error;
pub mod features;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod index;
pub mod matcher;
pub mod recommender;
pub mod scaler;
pub mod text;
pub mod vector;

pub use artifacts::{ArtifactPaths, Manifest};
pub use error::{QueryKind, SearchError, SearchResult};
pub use features::FeatureBuilder;
pub use index::{Neighbor, NeighborIndex};
pub use recommender::{ArtistSongs, Recommender, RecommenderSettings};
pub use scaler::StandardScaler;
pub use text::TfidfVectorizer;
pub use vector::{FeatureVector, SparseVector};
