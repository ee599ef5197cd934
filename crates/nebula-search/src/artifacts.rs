//! On-disk model artifacts.
//!
//! A model directory holds the cleaned catalog (`catalog.db`), the fitted
//! vectorizer, scaler and neighbor index as gzip-compressed JSON, and a
//! plain JSON manifest describing the training run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

pub const CATALOG_FILE: &str = "catalog.db";
pub const VECTORIZER_FILE: &str = "vectorizer.json.gz";
pub const SCALER_FILE: &str = "scaler.json.gz";
pub const NEIGHBORS_FILE: &str = "neighbors.json.gz";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of every artifact inside one model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: model_dir.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn catalog(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    #[must_use]
    pub fn vectorizer(&self) -> PathBuf {
        self.root.join(VECTORIZER_FILE)
    }

    #[must_use]
    pub fn scaler(&self) -> PathBuf {
        self.root.join(SCALER_FILE)
    }

    #[must_use]
    pub fn neighbors(&self) -> PathBuf {
        self.root.join(NEIGHBORS_FILE)
    }

    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// All artifact paths, catalog first.
    #[must_use]
    pub fn all(&self) -> [PathBuf; 5] {
        [
            self.catalog(),
            self.vectorizer(),
            self.scaler(),
            self.neighbors(),
            self.manifest(),
        ]
    }

    /// Artifacts that do not exist yet.
    #[must_use]
    pub fn missing(&self) -> Vec<PathBuf> {
        self.all().into_iter().filter(|p| !p.exists()).collect()
    }

    /// Fail with [`SearchError::MissingArtifact`] on the first absent file.
    pub fn require_all(&self) -> SearchResult<()> {
        match self.missing().into_iter().next() {
            Some(path) => Err(SearchError::MissingArtifact { path }),
            None => Ok(()),
        }
    }
}

/// Summary of a training run, written alongside the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub trained_at: DateTime<Utc>,
    /// Cleaned catalog size.
    pub rows: usize,
    pub vocabulary_size: usize,
    /// Default neighbor count of the stored index.
    pub neighbors: usize,
}

impl Manifest {
    #[must_use]
    pub fn new(rows: usize, vocabulary_size: usize, neighbors: usize) -> Self {
        Self {
            trained_at: Utc::now(),
            rows,
            vocabulary_size,
            neighbors,
        }
    }

    pub fn save(&self, path: &Path) -> SearchResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> SearchResult<Self> {
        let file = open_artifact(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn open_artifact(path: &Path) -> SearchResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SearchError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            SearchError::Io(e)
        }
    })
}

/// Write `value` as gzip-compressed JSON.
pub fn save_gzip_json<T: Serialize>(value: &T, path: &Path) -> SearchResult<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value)?;
    encoder.finish()?.flush()?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Read a value written by [`save_gzip_json`].
///
/// # Errors
/// [`SearchError::MissingArtifact`] if the file does not exist.
pub fn load_gzip_json<T: DeserializeOwned>(path: &Path) -> SearchResult<T> {
    let file = open_artifact(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    Ok(serde_json::from_reader(decoder)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_layout() {
        let paths = ArtifactPaths::new("/models");
        assert_eq!(paths.catalog(), PathBuf::from("/models/catalog.db"));
        assert_eq!(paths.neighbors(), PathBuf::from("/models/neighbors.json.gz"));
        assert_eq!(paths.all().len(), 5);
    }

    #[test]
    fn test_gzip_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.json.gz");
        let values = vec![1.5_f64, -2.0, 3.25];

        save_gzip_json(&values, &path).unwrap();
        let loaded: Vec<f64> = load_gzip_json(&path).unwrap();
        assert_eq!(loaded, values);
    }

    #[test]
    fn test_missing_file_is_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::new(dir.path());

        let err = load_gzip_json::<Vec<f64>>(&paths.scaler()).unwrap_err();
        assert!(matches!(err, SearchError::MissingArtifact { .. }));
        assert!(paths.require_all().unwrap_err().is_config());
        assert_eq!(paths.missing().len(), 5);
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let manifest = Manifest::new(13, 42, 11);

        manifest.save(&path).unwrap();
        assert_eq!(Manifest::load(&path).unwrap(), manifest);
    }
}
