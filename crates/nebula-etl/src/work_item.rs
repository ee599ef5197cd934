use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;
use uuid::Uuid;

/// One training run flowing through clean → fit → publish.
///
/// Every run gets a fresh id, so the workflow state store never treats a
/// new run as already completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRun {
    id: String,
    /// Raw catalog CSV being trained on.
    pub data_path: PathBuf,
}

impl TrainingRun {
    #[must_use]
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            id: format!("train-{}", Uuid::new_v4()),
            data_path,
        }
    }
}

impl WorkItem for TrainingRun {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for TrainingRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.data_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_get_distinct_ids() {
        let a = TrainingRun::new(PathBuf::from("songs.csv"));
        let b = TrainingRun::new(PathBuf::from("songs.csv"));
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("train-"));
    }

    #[test]
    fn test_training_run_display() {
        let run = TrainingRun::new(PathBuf::from("/data/songs.csv"));
        assert!(format!("{run}").contains("songs.csv"));
    }
}
