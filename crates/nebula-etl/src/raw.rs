//! Raw catalog CSV ingestion.
//!
//! Cells are read as optional strings so that missing values survive until
//! the cleaning step decides what to drop. Typed parsing happens only for
//! rows that are kept.

use std::io::Read;
use std::path::Path;

use nebula_core::model::Song;
use serde::Deserialize;

use crate::error::{TrainError, TrainResult};

/// Columns the raw catalog must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "track_name",
    "artist_name",
    "album_name",
    "album_type",
    "artist_genres",
    "track_popularity",
    "artist_popularity",
    "artist_followers",
    "track_duration_min",
    "album_total_tracks",
    "explicit",
];

/// One raw CSV row. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSong {
    /// 1-based line in the source file.
    #[serde(skip)]
    pub line: u64,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub album_type: Option<String>,
    pub artist_genres: Option<String>,
    pub track_popularity: Option<String>,
    pub artist_popularity: Option<String>,
    pub artist_followers: Option<String>,
    pub track_duration_min: Option<String>,
    pub album_total_tracks: Option<String>,
    pub explicit: Option<String>,
}

impl RawSong {
    /// The deduplication key.
    #[must_use]
    pub fn key(&self) -> (Option<&str>, Option<&str>) {
        (self.track_name.as_deref(), self.artist_name.as_deref())
    }

    /// Whether every cell is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.track_name,
            &self.artist_name,
            &self.album_name,
            &self.album_type,
            &self.artist_genres,
            &self.track_popularity,
            &self.artist_popularity,
            &self.artist_followers,
            &self.track_duration_min,
            &self.album_total_tracks,
            &self.explicit,
        ]
        .iter()
        .all(|cell| cell.is_some())
    }

    /// Parse into a catalog row.
    ///
    /// # Errors
    /// [`TrainError::InvalidData`] for a missing cell or an unparseable value.
    pub fn into_song(self) -> TrainResult<Song> {
        let line = self.line;
        let text = |value: Option<String>, column: &'static str| {
            value.ok_or(TrainError::InvalidData {
                line,
                column,
                value: String::new(),
            })
        };

        let track_popularity =
            parse_count(line, "track_popularity", self.track_popularity.as_deref())?;
        let artist_popularity =
            parse_count(line, "artist_popularity", self.artist_popularity.as_deref())?;
        let artist_followers =
            parse_count(line, "artist_followers", self.artist_followers.as_deref())?;
        let album_total_tracks =
            parse_count(line, "album_total_tracks", self.album_total_tracks.as_deref())?;
        let track_duration_min =
            parse_decimal(line, "track_duration_min", self.track_duration_min.as_deref())?;
        let explicit = parse_flag(line, "explicit", self.explicit.as_deref())?;

        Ok(Song::new(
            text(self.track_name, "track_name")?,
            text(self.artist_name, "artist_name")?,
            text(self.album_name, "album_name")?,
        )
        .with_album_type(text(self.album_type, "album_type")?)
        .with_genres(text(self.artist_genres, "artist_genres")?)
        .with_popularity(track_popularity, artist_popularity)
        .with_followers(artist_followers)
        .with_duration_min(track_duration_min)
        .with_album_total_tracks(album_total_tracks)
        .with_explicit(explicit))
    }
}

fn invalid(line: u64, column: &'static str, value: Option<&str>) -> TrainError {
    TrainError::InvalidData {
        line,
        column,
        value: value.unwrap_or_default().to_string(),
    }
}

fn parse_decimal(line: u64, column: &'static str, value: Option<&str>) -> TrainResult<f64> {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(line, column, value))
}

/// Counts accept integer or integral decimal notation (`87`, `87.0`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count<T: TryFrom<u64>>(
    line: u64,
    column: &'static str,
    value: Option<&str>,
) -> TrainResult<T> {
    let raw = value.ok_or_else(|| invalid(line, column, value))?;
    let whole = match raw.parse::<u64>() {
        Ok(n) => n,
        Err(_) => {
            let decimal = parse_decimal(line, column, value)?;
            if decimal < 0.0 || decimal.fract() != 0.0 || decimal > 1e15 {
                return Err(invalid(line, column, value));
            }
            decimal as u64
        }
    };
    T::try_from(whole).map_err(|_| invalid(line, column, value))
}

fn parse_flag(line: u64, column: &'static str, value: Option<&str>) -> TrainResult<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1" | "1.0") => Ok(true),
        Some("false" | "0" | "0.0") => Ok(false),
        _ => Err(invalid(line, column, value)),
    }
}

/// Read every row from a CSV source with a header row.
///
/// # Errors
/// [`TrainError::MissingColumn`] when a required header is absent, or a CSV
/// error for malformed input.
pub fn read_raw_songs<R: Read>(source: R) -> TrainResult<Vec<RawSong>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(TrainError::MissingColumn((*missing).to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut raw: RawSong = record.deserialize(Some(&headers))?;
        raw.line = record.position().map_or(0, csv::Position::line);
        rows.push(raw);
    }
    Ok(rows)
}

/// Read the raw catalog at `path`.
pub fn read_raw_file(path: &Path) -> TrainResult<Vec<RawSong>> {
    let file = std::fs::File::open(path)?;
    let rows = read_raw_songs(std::io::BufReader::new(file))?;
    log::info!("Read {} raw rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "track_name,artist_name,album_name,album_type,artist_genres,\
track_popularity,artist_popularity,artist_followers,track_duration_min,album_total_tracks,explicit";

    fn read(body: &str) -> TrainResult<Vec<RawSong>> {
        read_raw_songs(format!("{HEADER}\n{body}").as_bytes())
    }

    #[test]
    fn test_reads_complete_row() {
        let rows = read("Yellow,Coldplay,Parachutes,album,\"permanent wave, pop\",80,86,45000000,4.45,10,False\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 2);
        assert!(rows[0].is_complete());

        let song = rows[0].clone().into_song().unwrap();
        assert_eq!(song.artist_genres, "permanent wave, pop");
        assert_eq!(song.artist_followers, 45_000_000);
        assert!(!song.explicit);
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let rows = read("Yellow,Coldplay,,album,pop,80,86,1,4.45,10,0\n").unwrap();
        assert!(rows[0].album_name.is_none());
        assert!(!rows[0].is_complete());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = format!("{HEADER},track_id\nHello,Adele,25,album,pop,70,80,1,4.9,11,1,abc123\n");
        let rows = read_raw_songs(csv.as_bytes()).unwrap();
        assert!(rows[0].clone().into_song().unwrap().explicit);
    }

    #[test]
    fn test_missing_column_rejected() {
        let err = read_raw_songs("track_name,artist_name\nA,B\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TrainError::MissingColumn(ref c) if c == "album_name"));
    }

    #[test]
    fn test_decimal_counts_accepted() {
        let rows = read("Hello,Adele,25,album,pop,70.0,80,1e3,4.9,11.0,true\n").unwrap();
        let song = rows[0].clone().into_song().unwrap();
        assert_eq!(song.track_popularity, 70);
        assert_eq!(song.artist_followers, 1000);
        assert_eq!(song.album_total_tracks, 11);
    }

    #[test]
    fn test_invalid_value_names_column() {
        let rows = read("Hello,Adele,25,album,pop,seventy,80,1,4.9,11,true\n").unwrap();
        let err = rows[0].clone().into_song().unwrap_err();
        assert!(matches!(
            err,
            TrainError::InvalidData { line: 2, column: "track_popularity", .. }
        ));
    }

    #[test]
    fn test_invalid_flag() {
        let rows = read("Hello,Adele,25,album,pop,70,80,1,4.9,11,maybe\n").unwrap();
        assert!(rows[0].clone().into_song().is_err());
    }
}
