//! Feature builder: turns a catalog row into its combined feature vector.

use nebula_core::model::{Song, NUMERIC_COLUMNS};

use crate::error::{SearchError, SearchResult};
use crate::scaler::StandardScaler;
use crate::text::TfidfVectorizer;
use crate::vector::FeatureVector;

/// Default vocabulary cap for the text vectorizer.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// The text a row contributes to the vocabulary: artist, genres, album and
/// album type, space separated.
#[must_use]
pub fn text_features(song: &Song) -> String {
    format!(
        "{} {} {} {}",
        song.artist_name, song.artist_genres, song.album_name, song.album_type
    )
}

/// Fitted vectorizer and scaler, applied together.
///
/// Online code only ever uses a builder restored from training artifacts;
/// nothing is refitted per query.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBuilder {
    vectorizer: TfidfVectorizer,
    scaler: StandardScaler,
}

impl FeatureBuilder {
    /// Combine an already fitted vectorizer and scaler.
    ///
    /// # Errors
    /// Returns a configuration error if either is unfitted or the scaler was
    /// not fitted on the catalog's numeric columns.
    pub fn new(vectorizer: TfidfVectorizer, scaler: StandardScaler) -> SearchResult<Self> {
        if !vectorizer.is_fitted() {
            return Err(SearchError::Config("text vectorizer is not fitted".to_string()));
        }
        if scaler.width() != NUMERIC_COLUMNS.len() {
            return Err(SearchError::Config(format!(
                "numeric scaler has {} columns, expected {} ({})",
                scaler.width(),
                NUMERIC_COLUMNS.len(),
                NUMERIC_COLUMNS.join(", ")
            )));
        }
        Ok(Self { vectorizer, scaler })
    }

    /// Fit a vectorizer (English stop words removed, vocabulary capped at
    /// `max_features`) and a scaler over `songs`.
    pub fn fit(songs: &[Song], max_features: usize) -> SearchResult<Self> {
        let documents: Vec<String> = songs.iter().map(text_features).collect();
        let mut vectorizer = TfidfVectorizer::new()
            .with_english_stop_words()
            .with_max_features(max_features);
        vectorizer.fit(&documents)?;

        let numeric: Vec<[f64; 6]> = songs.iter().map(Song::numeric_features).collect();
        let mut scaler = StandardScaler::new();
        scaler.fit(&numeric)?;

        Self::new(vectorizer, scaler)
    }

    /// Build the combined vector for one row.
    pub fn build(&self, song: &Song) -> SearchResult<FeatureVector> {
        let text = self.vectorizer.transform(&text_features(song))?;
        let numeric = self.scaler.transform(&song.numeric_features())?;
        Ok(FeatureVector::new(text, numeric))
    }

    /// Build vectors for every row, in order.
    pub fn build_all(&self, songs: &[Song]) -> SearchResult<Vec<FeatureVector>> {
        songs.iter().map(|s| self.build(s)).collect()
    }

    #[must_use]
    pub fn text_width(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    #[must_use]
    pub fn numeric_width(&self) -> usize {
        self.scaler.width()
    }

    #[must_use]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }
}
