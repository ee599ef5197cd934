use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;
use crate::model::Song;

use super::migrations::MIGRATIONS;

/// A connection to the catalog artifact database.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Song table
impl Database {
    /// Replace the whole catalog with `songs`, in order.
    ///
    /// Runs in a single transaction: either every row is written or the
    /// previous contents are kept.
    pub fn replace_songs(&self, songs: &[Song]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM songs", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO songs (
                    position, track_name, artist_name, album_name, album_type,
                    artist_genres, track_popularity, artist_popularity,
                    artist_followers, track_duration_min, album_total_tracks, explicit
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for (position, song) in songs.iter().enumerate() {
                stmt.execute(rusqlite::params![
                    i64::try_from(position).unwrap_or(i64::MAX),
                    song.track_name,
                    song.artist_name,
                    song.album_name,
                    song.album_type,
                    song.artist_genres,
                    i64::from(song.track_popularity),
                    i64::from(song.artist_popularity),
                    i64::try_from(song.artist_followers).unwrap_or(i64::MAX),
                    song.track_duration_min,
                    i64::from(song.album_total_tracks),
                    song.explicit,
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("Wrote {} songs to catalog", songs.len());
        Ok(())
    }

    /// List every song in catalog order.
    pub fn list_songs(&self) -> Result<Vec<Song>> {
        let mut stmt = self.conn.prepare(
            "SELECT track_name, artist_name, album_name, album_type, artist_genres,
                    track_popularity, artist_popularity, artist_followers,
                    track_duration_min, album_total_tracks, explicit
             FROM songs
             ORDER BY position",
        )?;

        let songs = stmt
            .query_map([], Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(songs)
    }

    /// Number of songs in the catalog.
    pub fn count_songs(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            track_name: row.get(0)?,
            artist_name: row.get(1)?,
            album_name: row.get(2)?,
            album_type: row.get(3)?,
            artist_genres: row.get(4)?,
            track_popularity: narrow(row, 5)?,
            artist_popularity: narrow(row, 6)?,
            artist_followers: narrow(row, 7)?,
            track_duration_min: row.get(8)?,
            album_total_tracks: narrow(row, 9)?,
            explicit: row.get(10)?,
        })
    }
}

/// Read an INTEGER column into a narrower unsigned type.
fn narrow<T: TryFrom<i64>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T::Error: std::error::Error + Send + Sync + 'static,
{
    let value: i64 = row.get(idx)?;
    T::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
