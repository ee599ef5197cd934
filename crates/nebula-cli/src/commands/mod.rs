pub mod config;
pub mod query;
pub mod serve;
pub mod status;
pub mod train;

use anyhow::{Context, Result};
use nebula_etl::Config;
use nebula_search::{ArtifactPaths, Recommender};

pub use query::{run_artist, run_playlist, run_recommend};
pub use serve::{run_serve, server_config};
pub use status::show_status;
pub use train::run_train;

/// Load the published model, pointing at `nebula train` when it is absent.
pub fn load_recommender(config: &Config) -> Result<Recommender> {
    let paths = ArtifactPaths::new(&config.model_dir);
    Recommender::load(&paths, config.recommender_settings()).with_context(|| {
        format!(
            "Failed to load model from {} (run 'nebula train' first)",
            config.model_dir.display()
        )
    })
}
