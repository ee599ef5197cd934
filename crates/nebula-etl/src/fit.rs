//! Fit stage: vectorizer, scaler and neighbor index over the staged catalog.

use nebula_core::Catalog;
use nebula_search::artifacts::save_gzip_json;
use nebula_search::{ArtifactPaths, FeatureBuilder, Manifest, NeighborIndex};
use treadle::{Stage, StageContext, StageOutcome};

use crate::error::{TrainError, TrainResult};
use crate::pipeline::TrainOptions;

/// The Fit stage: learn the feature space and write the fitted artifacts
/// next to the staged catalog.
#[derive(Debug)]
pub struct FitStage {
    staging: ArtifactPaths,
    options: TrainOptions,
}

impl FitStage {
    #[must_use]
    pub fn new(staging: ArtifactPaths, options: TrainOptions) -> Self {
        Self { staging, options }
    }

    /// Fit and write every model artifact into the staging directory.
    pub fn run(&self) -> TrainResult<Manifest> {
        let catalog = Catalog::open(self.staging.catalog())?;
        if catalog.is_empty() {
            return Err(TrainError::EmptyCatalog);
        }

        let features = FeatureBuilder::fit(catalog.songs(), self.options.max_features)?;
        let vectors = features.build_all(catalog.songs())?;
        let index = NeighborIndex::fit(vectors, features.text_width(), self.options.neighbors)?;

        save_gzip_json(features.vectorizer(), &self.staging.vectorizer())?;
        save_gzip_json(features.scaler(), &self.staging.scaler())?;
        save_gzip_json(&index, &self.staging.neighbors())?;

        let manifest = Manifest::new(catalog.len(), features.text_width(), self.options.neighbors);
        manifest.save(&self.staging.manifest())?;
        Ok(manifest)
    }
}

#[async_trait::async_trait]
impl Stage for FitStage {
    fn name(&self) -> &str {
        "fit"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        match self.run() {
            Ok(manifest) => {
                log::info!(
                    "Fit complete: {} rows, {} terms, {} neighbors",
                    manifest.rows,
                    manifest.vocabulary_size,
                    manifest.neighbors
                );
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Fit failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_core::fixtures::sample_songs;
    use nebula_core::schema::Database;
    use nebula_search::artifacts::load_gzip_json;
    use nebula_search::TfidfVectorizer;
    use tempfile::TempDir;

    fn staged(dir: &TempDir) -> ArtifactPaths {
        let staging = ArtifactPaths::new(dir.path());
        Database::open(staging.catalog())
            .unwrap()
            .replace_songs(&sample_songs())
            .unwrap();
        staging
    }

    #[test]
    fn test_fit_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let staging = staged(&dir);

        let manifest = FitStage::new(staging.clone(), TrainOptions::default()).run().unwrap();
        assert_eq!(manifest.rows, sample_songs().len());
        assert!(staging.missing().is_empty());

        let vectorizer: TfidfVectorizer = load_gzip_json(&staging.vectorizer()).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), manifest.vocabulary_size);
        let index: NeighborIndex = load_gzip_json(&staging.neighbors()).unwrap();
        assert_eq!(index.restore().unwrap().len(), manifest.rows);
    }

    #[test]
    fn test_fit_respects_options() {
        let dir = TempDir::new().unwrap();
        let staging = staged(&dir);
        let options = TrainOptions {
            max_features: 3,
            neighbors: 4,
        };

        let manifest = FitStage::new(staging, options).run().unwrap();
        assert_eq!(manifest.vocabulary_size, 3);
        assert_eq!(manifest.neighbors, 4);
    }

    #[test]
    fn test_fit_without_staged_catalog_fails() {
        let dir = TempDir::new().unwrap();
        let staging = ArtifactPaths::new(dir.path());
        // opening creates an empty catalog database
        assert!(matches!(
            FitStage::new(staging, TrainOptions::default()).run(),
            Err(TrainError::EmptyCatalog)
        ));
    }
}
