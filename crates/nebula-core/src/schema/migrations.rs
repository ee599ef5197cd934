/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Cleaned catalog. `position` is the row identity used by the neighbor index.
CREATE TABLE IF NOT EXISTS songs (
    position INTEGER PRIMARY KEY,
    track_name TEXT NOT NULL,
    artist_name TEXT NOT NULL,
    album_name TEXT NOT NULL,
    album_type TEXT NOT NULL,
    artist_genres TEXT NOT NULL,
    track_popularity INTEGER NOT NULL,
    artist_popularity INTEGER NOT NULL,
    artist_followers INTEGER NOT NULL,
    track_duration_min REAL NOT NULL,
    album_total_tracks INTEGER NOT NULL,
    explicit INTEGER NOT NULL,
    UNIQUE (track_name, artist_name)
);

CREATE INDEX IF NOT EXISTS idx_songs_artist_name ON songs(artist_name);
";

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
