//! The recommender: catalog, fitted features and neighbor index loaded
//! together and queried read-only.

use nebula_core::model::{ArtistTrack, RecommendedTrack, Song};
use nebula_core::Catalog;
use serde::{Deserialize, Serialize};

use crate::artifacts::{load_gzip_json, ArtifactPaths, Manifest};
use crate::error::{QueryKind, SearchError, SearchResult};
use crate::features::FeatureBuilder;
use crate::index::{Neighbor, NeighborIndex};
use crate::matcher::{self, DEFAULT_MATCH_THRESHOLD};
use crate::scaler::StandardScaler;
use crate::text::TfidfVectorizer;

/// Default number of recommendations per query.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// Default playlist length.
pub const DEFAULT_PLAYLIST_SIZE: usize = 10;

/// Query-time knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommenderSettings {
    /// Minimum fuzzy score (0..=100) for a query to resolve.
    pub match_threshold: f64,
    pub recommendations: usize,
    pub playlist_size: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            recommendations: DEFAULT_RECOMMENDATIONS,
            playlist_size: DEFAULT_PLAYLIST_SIZE,
        }
    }
}

/// A track query resolved to a catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct SongMatch<'a> {
    pub row: usize,
    pub song: &'a Song,
    pub score: f64,
}

/// An artist query resolved to a catalog artist name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistMatch<'a> {
    pub artist_name: &'a str,
    pub score: f64,
}

/// Every track of a resolved artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSongs {
    /// Canonical catalog spelling of the artist.
    pub artist_name: String,
    pub songs: Vec<ArtistTrack>,
}

/// Composition root of the online service.
///
/// Built once at startup from a consistent artifact set and shared
/// read-only. Nothing in here is mutated after construction.
#[derive(Debug)]
pub struct Recommender {
    catalog: Catalog,
    features: FeatureBuilder,
    index: NeighborIndex,
    settings: RecommenderSettings,
    manifest: Option<Manifest>,
}

impl Recommender {
    /// Assemble a recommender, checking that the parts belong together.
    ///
    /// # Errors
    /// [`SearchError::Config`] when the catalog is empty, the index row count
    /// differs from the catalog size, or the index width is not the
    /// vocabulary size plus the numeric columns.
    pub fn new(
        catalog: Catalog,
        features: FeatureBuilder,
        index: NeighborIndex,
        settings: RecommenderSettings,
    ) -> SearchResult<Self> {
        if catalog.is_empty() {
            return Err(SearchError::Config("catalog is empty".to_string()));
        }
        if index.len() != catalog.len() {
            return Err(SearchError::Config(format!(
                "neighbor index has {} rows but catalog has {}",
                index.len(),
                catalog.len()
            )));
        }
        if index.text_width() != features.text_width()
            || index.numeric_width() != features.numeric_width()
        {
            return Err(SearchError::Config(format!(
                "neighbor index width {} does not match feature width {}",
                index.width(),
                features.text_width() + features.numeric_width()
            )));
        }

        Ok(Self {
            catalog,
            features,
            index,
            settings,
            manifest: None,
        })
    }

    /// Load every artifact from a model directory.
    ///
    /// # Errors
    /// [`SearchError::MissingArtifact`] for an absent file and
    /// [`SearchError::Config`] for an inconsistent set.
    pub fn load(paths: &ArtifactPaths, settings: RecommenderSettings) -> SearchResult<Self> {
        paths.require_all()?;
        log::info!("Loading model artifacts from {}", paths.root().display());

        let catalog = Catalog::open(paths.catalog())?;
        let vectorizer: TfidfVectorizer = load_gzip_json(&paths.vectorizer())?;
        let scaler: StandardScaler = load_gzip_json(&paths.scaler())?;
        let features = FeatureBuilder::new(vectorizer, scaler)?;
        let index = load_gzip_json::<NeighborIndex>(&paths.neighbors())?.restore()?;
        let manifest = Manifest::load(&paths.manifest())?;

        let mut recommender = Self::new(catalog, features, index, settings)?;
        log::info!(
            "Recommender ready: {} songs, {} terms, {} neighbors per lookup, trained {}",
            recommender.catalog.len(),
            recommender.features.text_width(),
            recommender.index.default_neighbors(),
            manifest.trained_at
        );
        recommender.manifest = Some(manifest);
        Ok(recommender)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &RecommenderSettings {
        &self.settings
    }

    /// Manifest of the training run, when loaded from disk.
    #[must_use]
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// Resolve a free-text track name to a catalog row.
    pub fn find_song(&self, track_name: &str) -> SearchResult<SongMatch<'_>> {
        let m = matcher::best_match(
            track_name,
            self.catalog.track_names(),
            self.settings.match_threshold,
            QueryKind::Track,
        )?;
        let song = self.catalog.song(m.index)?;
        Ok(SongMatch {
            row: m.index,
            song,
            score: m.score,
        })
    }

    /// Resolve a free-text artist name to a distinct catalog artist.
    pub fn find_artist(&self, artist_name: &str) -> SearchResult<ArtistMatch<'_>> {
        let m = matcher::best_match(
            artist_name,
            self.catalog.artist_names(),
            self.settings.match_threshold,
            QueryKind::Artist,
        )?;
        Ok(ArtistMatch {
            artist_name: m.choice,
            score: m.score,
        })
    }

    /// The `k` nearest rows to catalog row `row`, the row itself included.
    pub fn neighbors(&self, row: usize, k: usize) -> SearchResult<Vec<Neighbor>> {
        let song = self.catalog.song(row)?;
        let query = self.features.build(song)?;
        self.index.kneighbors(&query, Some(k))
    }

    /// Up to `count` nearest rows to the track matching `track_name`,
    /// excluding that track, nearest first.
    pub fn similar(&self, track_name: &str, count: usize) -> SearchResult<Vec<Neighbor>> {
        let seed = self.find_song(track_name)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut neighbors = self.neighbors(seed.row, count.saturating_add(1))?;
        neighbors.retain(|n| n.row != seed.row);
        neighbors.truncate(count);
        log::debug!(
            "'{}' resolved to row {} ({:.1}); {} neighbors",
            track_name,
            seed.row,
            seed.score,
            neighbors.len()
        );
        Ok(neighbors)
    }

    fn project(&self, neighbors: &[Neighbor]) -> SearchResult<Vec<RecommendedTrack>> {
        neighbors
            .iter()
            .map(|n| Ok(RecommendedTrack::from(self.catalog.song(n.row)?)))
            .collect()
    }

    /// Recommend `count` tracks (the configured default when `None`).
    pub fn recommend(
        &self,
        track_name: &str,
        count: Option<usize>,
    ) -> SearchResult<Vec<RecommendedTrack>> {
        let count = count.unwrap_or(self.settings.recommendations);
        self.project(&self.similar(track_name, count)?)
    }

    /// A playlist of `size` tracks (the configured default when `None`).
    pub fn generate_playlist(
        &self,
        track_name: &str,
        size: Option<usize>,
    ) -> SearchResult<Vec<RecommendedTrack>> {
        let size = size.unwrap_or(self.settings.playlist_size);
        self.project(&self.similar(track_name, size)?)
    }

    /// Fuzzy-resolve an artist and list all of their tracks.
    pub fn songs_by_artist(&self, artist_name: &str) -> SearchResult<ArtistSongs> {
        let artist = self.find_artist(artist_name)?;
        let songs = self
            .catalog
            .songs_by_artist(artist.artist_name)
            .into_iter()
            .map(ArtistTrack::from)
            .collect();
        Ok(ArtistSongs {
            artist_name: artist.artist_name.to_string(),
            songs,
        })
    }
}
