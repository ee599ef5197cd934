//! Offline training pipeline for nebula-sound.
//!
//! Implements the clean, fit, and publish stages as treadle `Stage`
//! implementations, plus configuration shared by every binary surface.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod clean;
pub mod config;
pub mod error;
pub mod fit;
pub mod pipeline;
pub mod publish;
pub mod raw;
pub mod work_item;

pub use clean::CleanStage;
pub use config::Config;
pub use error::{TrainError, TrainResult};
pub use fit::FitStage;
pub use pipeline::{build_training_pipeline, execute_training, TrainOptions};
pub use publish::PublishStage;
pub use work_item::TrainingRun;
