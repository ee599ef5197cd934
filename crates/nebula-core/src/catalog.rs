//! In-memory catalog store.
//!
//! The online service loads the cleaned catalog once at startup and only
//! ever reads from it. A row's identity is its position in the catalog,
//! which is also how the neighbor index refers to it.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Song;
use crate::schema::Database;

/// The cleaned song catalog, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Build a catalog from rows, enforcing `(track_name, artist_name)` uniqueness.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateEntry`] for the first repeated pair.
    pub fn new(songs: Vec<Song>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(songs.len());
        for song in &songs {
            if !seen.insert((song.track_name.as_str(), song.artist_name.as_str())) {
                return Err(Error::DuplicateEntry {
                    track_name: song.track_name.clone(),
                    artist_name: song.artist_name.clone(),
                });
            }
        }
        Ok(Self { songs })
    }

    /// Load the catalog from an open database.
    pub fn load(db: &Database) -> Result<Self> {
        Self::new(db.list_songs()?)
    }

    /// Open the catalog database at `path` and load every row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::open(path)?;
        let catalog = Self::load(&db)?;
        log::info!("Loaded {} songs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Song> {
        self.songs.get(row)
    }

    /// Like [`Catalog::get`], but a missing row is an error.
    pub fn song(&self, row: usize) -> Result<&Song> {
        self.get(row).ok_or(Error::RowOutOfRange {
            row,
            len: self.songs.len(),
        })
    }

    /// Track names in catalog order (one per row, repeats included).
    pub fn track_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.songs.iter().map(|s| s.track_name.as_str())
    }

    /// Distinct artist names in first-seen order.
    #[must_use]
    pub fn artist_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.songs
            .iter()
            .map(|s| s.artist_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// All rows whose artist is exactly `artist_name`, in catalog order.
    #[must_use]
    pub fn songs_by_artist(&self, artist_name: &str) -> Vec<&Song> {
        self.songs
            .iter()
            .filter(|s| s.artist_name == artist_name)
            .collect()
    }
}
