use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("duplicate catalog entry: '{track_name}' by '{artist_name}'")]
    DuplicateEntry {
        track_name: String,
        artist_name: String,
    },

    #[error("catalog row {row} out of range (catalog has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
