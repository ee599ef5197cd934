//! Clean stage: raw CSV rows in, deduplicated complete catalog out.

use std::collections::HashSet;
use std::path::PathBuf;

use nebula_core::model::Song;
use nebula_core::schema::Database;
use nebula_search::ArtifactPaths;
use treadle::{Stage, StageContext, StageOutcome};

use crate::error::{TrainError, TrainResult};
use crate::raw::{read_raw_file, RawSong};

/// What cleaning kept and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub songs: Vec<Song>,
    pub duplicates: usize,
    pub incomplete: usize,
}

/// Deduplicate by `(track_name, artist_name)` keeping the first occurrence,
/// then drop rows with any missing cell.
///
/// Deduplication runs first, so a complete row that repeats an earlier
/// incomplete one is dropped along with it.
///
/// # Errors
/// [`TrainError::InvalidData`] when a kept row has an unparseable value.
pub fn clean_rows(rows: Vec<RawSong>) -> TrainResult<CleanReport> {
    let total = rows.len();

    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<RawSong> = rows
        .into_iter()
        .filter(|row| {
            let (track, artist) = row.key();
            seen.insert((track.map(str::to_owned), artist.map(str::to_owned)))
        })
        .collect();
    let duplicates = total - unique.len();

    let complete: Vec<RawSong> = unique.into_iter().filter(RawSong::is_complete).collect();
    let incomplete = total - duplicates - complete.len();

    let songs = complete
        .into_iter()
        .map(RawSong::into_song)
        .collect::<TrainResult<Vec<_>>>()?;

    Ok(CleanReport {
        songs,
        duplicates,
        incomplete,
    })
}

/// The Clean stage: read the raw CSV, clean it, and write the staged catalog.
#[derive(Debug)]
pub struct CleanStage {
    data_path: PathBuf,
    staging: ArtifactPaths,
}

impl CleanStage {
    #[must_use]
    pub fn new(data_path: PathBuf, staging: ArtifactPaths) -> Self {
        Self { data_path, staging }
    }

    /// Run the cleaning step. Any previous staging content is discarded.
    pub fn run(&self) -> TrainResult<CleanReport> {
        let rows = read_raw_file(&self.data_path)?;
        let report = clean_rows(rows)?;
        if report.songs.is_empty() {
            return Err(TrainError::EmptyCatalog);
        }

        let root = self.staging.root();
        if root.exists() {
            std::fs::remove_dir_all(root)?;
        }
        std::fs::create_dir_all(root)?;

        let db = Database::open(self.staging.catalog())?;
        db.replace_songs(&report.songs)?;
        log::debug!(
            "Staged {} rows in {}",
            db.count_songs()?,
            self.staging.catalog().display()
        );
        Ok(report)
    }
}

#[async_trait::async_trait]
impl Stage for CleanStage {
    fn name(&self) -> &str {
        "clean"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Cleaning raw catalog {}", self.data_path.display());

        match self.run() {
            Ok(report) => {
                log::info!(
                    "Clean complete: {} songs kept, {} duplicates and {} incomplete rows dropped",
                    report.songs.len(),
                    report.duplicates,
                    report.incomplete
                );
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Clean failed: {e}"
            ))),
        }
    }
}
