//! Fitted sample recommender for tests.

use nebula_core::fixtures::sample_songs;
use nebula_core::Catalog;

use crate::error::SearchResult;
use crate::features::{FeatureBuilder, DEFAULT_MAX_FEATURES};
use crate::index::{NeighborIndex, DEFAULT_NEIGHBORS};
use crate::recommender::{Recommender, RecommenderSettings};

/// A recommender fitted in memory over the sample catalog.
pub fn sample_recommender() -> SearchResult<Recommender> {
    let songs = sample_songs();
    let features = FeatureBuilder::fit(&songs, DEFAULT_MAX_FEATURES)?;
    let vectors = features.build_all(&songs)?;
    let index = NeighborIndex::fit(vectors, features.text_width(), DEFAULT_NEIGHBORS)?;
    Recommender::new(
        Catalog::new(songs)?,
        features,
        index,
        RecommenderSettings::default(),
    )
}
