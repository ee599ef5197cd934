//! Display projections of a [`Song`] returned by the service surfaces.

use serde::{Deserialize, Serialize};

use crate::model::Song;

/// A recommended track: the columns shown for recommendations and playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedTrack {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
}

impl From<&Song> for RecommendedTrack {
    fn from(song: &Song) -> Self {
        Self {
            track_name: song.track_name.clone(),
            artist_name: song.artist_name.clone(),
            album_name: song.album_name.clone(),
        }
    }
}

/// A track listed under an artist search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistTrack {
    pub track_name: String,
    pub album_name: String,
    pub track_popularity: u32,
}

impl From<&Song> for ArtistTrack {
    fn from(song: &Song) -> Self {
        Self {
            track_name: song.track_name.clone(),
            album_name: song.album_name.clone(),
            track_popularity: song.track_popularity,
        }
    }
}
