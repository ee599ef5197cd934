use serde::{Deserialize, Serialize};

/// Names of the numeric columns, in the order they enter the feature space.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "track_popularity",
    "artist_popularity",
    "artist_followers",
    "track_duration_min",
    "album_total_tracks",
    "explicit",
];

/// One row of the cleaned catalog.
///
/// Rows are created by the training pipeline's cleaning step and never
/// change afterwards. `(track_name, artist_name)` is unique within a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,

    /// Release type as reported by the source (`album`, `single`, `compilation`).
    pub album_type: String,

    /// Free-text genre list, kept verbatim.
    pub artist_genres: String,

    pub track_popularity: u32,
    pub artist_popularity: u32,
    pub artist_followers: u64,
    pub track_duration_min: f64,
    pub album_total_tracks: u32,
    pub explicit: bool,
}

impl Song {
    #[must_use]
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        album_name: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            album_name: album_name.into(),
            album_type: "album".to_string(),
            artist_genres: String::new(),
            track_popularity: 0,
            artist_popularity: 0,
            artist_followers: 0,
            track_duration_min: 0.0,
            album_total_tracks: 1,
            explicit: false,
        }
    }

    #[must_use]
    pub fn with_album_type(mut self, album_type: impl Into<String>) -> Self {
        self.album_type = album_type.into();
        self
    }

    #[must_use]
    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.artist_genres = genres.into();
        self
    }

    #[must_use]
    pub const fn with_popularity(mut self, track: u32, artist: u32) -> Self {
        self.track_popularity = track;
        self.artist_popularity = artist;
        self
    }

    #[must_use]
    pub const fn with_followers(mut self, followers: u64) -> Self {
        self.artist_followers = followers;
        self
    }

    #[must_use]
    pub const fn with_duration_min(mut self, minutes: f64) -> Self {
        self.track_duration_min = minutes;
        self
    }

    #[must_use]
    pub const fn with_album_total_tracks(mut self, tracks: u32) -> Self {
        self.album_total_tracks = tracks;
        self
    }

    #[must_use]
    pub const fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    /// Numeric attributes in [`NUMERIC_COLUMNS`] order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn numeric_features(&self) -> [f64; 6] {
        [
            f64::from(self.track_popularity),
            f64::from(self.artist_popularity),
            self.artist_followers as f64,
            self.track_duration_min,
            f64::from(self.album_total_tracks),
            if self.explicit { 1.0 } else { 0.0 },
        ]
    }
}
