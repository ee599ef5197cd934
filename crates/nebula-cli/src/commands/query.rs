//! One-shot query commands: `recommend`, `playlist` and `artist`.

use anyhow::Result;
use comfy_table::Table;
use nebula_core::model::{ArtistTrack, RecommendedTrack};
use nebula_etl::Config;
use nebula_search::{Recommender, SearchError, SearchResult};
use std::process::ExitCode;

use super::load_recommender;

pub const TRACK_HEADERS: [&str; 3] = ["Track", "Artist", "Album"];
pub const ARTIST_HEADERS: [&str; 3] = ["Track", "Album", "Popularity"];

pub fn run_recommend(config: &Config, track: &str, count: Option<usize>) -> Result<ExitCode> {
    let recommender = load_recommender(config)?;
    report(recommend_table(&recommender, track, count))
}

pub fn run_playlist(config: &Config, track: &str, size: Option<usize>) -> Result<ExitCode> {
    let recommender = load_recommender(config)?;
    report(playlist_table(&recommender, track, size))
}

pub fn run_artist(config: &Config, name: &str) -> Result<ExitCode> {
    let recommender = load_recommender(config)?;
    report(artist_table(&recommender, name).map(|(artist_name, table)| {
        println!("{artist_name}\n");
        table
    }))
}

/// Print a result table, or map an unresolved name to a failing exit code.
fn report(rendered: SearchResult<Table>) -> Result<ExitCode> {
    match rendered {
        Ok(table) => {
            println!("{table}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ SearchError::NotFound { .. }) => {
            eprintln!("✗ {e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn recommend_table(
    recommender: &Recommender,
    track: &str,
    count: Option<usize>,
) -> SearchResult<Table> {
    let tracks = recommender.recommend(track, count)?;
    Ok(build_table(&TRACK_HEADERS, track_rows(&tracks)))
}

pub fn playlist_table(
    recommender: &Recommender,
    track: &str,
    size: Option<usize>,
) -> SearchResult<Table> {
    let tracks = recommender.generate_playlist(track, size)?;
    Ok(build_table(&TRACK_HEADERS, track_rows(&tracks)))
}

/// The resolved artist name and a table of their songs.
pub fn artist_table(recommender: &Recommender, name: &str) -> SearchResult<(String, Table)> {
    let artist = recommender.songs_by_artist(name)?;
    let table = build_table(&ARTIST_HEADERS, artist_rows(&artist.songs));
    Ok((artist.artist_name, table))
}

pub fn track_rows(tracks: &[RecommendedTrack]) -> Vec<[String; 3]> {
    tracks
        .iter()
        .map(|t| [t.track_name.clone(), t.artist_name.clone(), t.album_name.clone()])
        .collect()
}

pub fn artist_rows(tracks: &[ArtistTrack]) -> Vec<[String; 3]> {
    tracks
        .iter()
        .map(|t| {
            [
                t.track_name.clone(),
                t.album_name.clone(),
                t.track_popularity.to_string(),
            ]
        })
        .collect()
}

/// Table with a numbered first column.
fn build_table(headers: &[&str; 3], rows: Vec<[String; 3]>) -> Table {
    let mut table = Table::new();
    table.set_header(std::iter::once("#").chain(headers.iter().copied()));
    for (i, row) in rows.into_iter().enumerate() {
        table.add_row(std::iter::once((i + 1).to_string()).chain(row));
    }
    table
}
