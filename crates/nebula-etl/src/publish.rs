//! Publish stage: move the staged artifact set into the model directory.

use std::path::Path;

use nebula_search::{ArtifactPaths, Manifest};
use treadle::{Stage, StageContext, StageOutcome};

use crate::error::{TrainError, TrainResult};

/// The Publish stage.
///
/// Only runs once clean and fit have both completed, so the live directory
/// never receives a partial set. The manifest moves last.
#[derive(Debug)]
pub struct PublishStage {
    staging: ArtifactPaths,
    target: ArtifactPaths,
}

impl PublishStage {
    #[must_use]
    pub fn new(staging: ArtifactPaths, target: ArtifactPaths) -> Self {
        Self { staging, target }
    }

    pub fn run(&self) -> TrainResult<Manifest> {
        if let Some(path) = self.staging.missing().into_iter().next() {
            return Err(TrainError::Unstaged { path });
        }
        let manifest = Manifest::load(&self.staging.manifest())?;

        std::fs::create_dir_all(self.target.root())?;
        for (from, to) in self.staging.all().iter().zip(self.target.all().iter()) {
            move_file(from, to)?;
        }
        std::fs::remove_dir_all(self.staging.root())?;
        Ok(manifest)
    }
}

fn move_file(from: &Path, to: &Path) -> TrainResult<()> {
    log::debug!("Publishing {} -> {}", from.display(), to.display());
    std::fs::rename(from, to)?;
    Ok(())
}

#[async_trait::async_trait]
impl Stage for PublishStage {
    fn name(&self) -> &str {
        "publish"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        _context: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        match self.run() {
            Ok(manifest) => {
                log::info!(
                    "Published model ({} songs) to {}",
                    manifest.rows,
                    self.target.root().display()
                );
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Publish failed: {e}"
            ))),
        }
    }
}
