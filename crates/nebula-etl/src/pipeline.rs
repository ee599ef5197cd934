use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use nebula_search::features::DEFAULT_MAX_FEATURES;
use nebula_search::index::DEFAULT_NEIGHBORS;
use nebula_search::{ArtifactPaths, Manifest};
use serde::{Deserialize, Serialize};
use treadle::Workflow;

use crate::{CleanStage, FitStage, PublishStage, TrainingRun};

/// Staging directory name inside the model directory.
pub const STAGING_DIR: &str = ".staging";

/// Workflow state database name inside the model directory.
pub const STATE_FILE: &str = "pipeline.db";

/// Fit-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Vocabulary cap for the text vectorizer.
    pub max_features: usize,
    /// Default neighbor count stored with the index.
    pub neighbors: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            neighbors: DEFAULT_NEIGHBORS,
        }
    }
}

/// Where clean and fit write before publish.
#[must_use]
pub fn staging_dir(model_dir: &Path) -> PathBuf {
    model_dir.join(STAGING_DIR)
}

/// Where the workflow keeps its stage state.
#[must_use]
pub fn state_path(model_dir: &Path) -> PathBuf {
    model_dir.join(STATE_FILE)
}

/// Build the clean → fit → publish training workflow.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_training_pipeline(
    data_path: PathBuf,
    model_dir: &Path,
    options: TrainOptions,
) -> treadle::Result<Workflow> {
    let staging = ArtifactPaths::new(staging_dir(model_dir));
    let target = ArtifactPaths::new(model_dir);

    Workflow::builder()
        .stage("clean", CleanStage::new(data_path, staging.clone()))
        .stage("fit", FitStage::new(staging.clone(), options))
        .stage("publish", PublishStage::new(staging, target))
        .dependency("fit", "clean")
        .dependency("publish", "fit")
        .build()
}

/// Drive `run` through `workflow` and return the published manifest.
///
/// Stage failures are reported through workflow events; a run that stops
/// before publishing is an error here.
///
/// # Errors
/// Returns an error if the state store cannot be opened, the workflow
/// fails, or no fresh manifest was published.
pub async fn execute_training(
    workflow: &Workflow,
    run: &TrainingRun,
    model_dir: &Path,
) -> Result<Manifest> {
    std::fs::create_dir_all(model_dir).context("Failed to create model directory")?;

    let mut store = treadle::SqliteStateStore::open(&state_path(model_dir))
        .await
        .context("Failed to open pipeline state store")?;

    let started = Utc::now();
    workflow
        .advance(run, &mut store)
        .await
        .context("Training pipeline execution failed")?;

    let manifest_path = ArtifactPaths::new(model_dir).manifest();
    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Training run {run} did not publish a model"))?;
    if manifest.trained_at < started {
        anyhow::bail!("Training run {run} did not publish a model; see stage errors above");
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_builds() {
        let model_dir = PathBuf::from("/tmp/nebula-model");
        let result = build_training_pipeline(
            PathBuf::from("/tmp/songs.csv"),
            &model_dir,
            TrainOptions::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_staging_inside_model_dir() {
        let model_dir = PathBuf::from("/models");
        assert!(staging_dir(&model_dir).starts_with(&model_dir));
        assert_eq!(state_path(&model_dir), PathBuf::from("/models/pipeline.db"));
    }
}
