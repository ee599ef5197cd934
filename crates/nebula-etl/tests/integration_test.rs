//! Integration tests for the full clean → fit → publish pipeline.
//!
//! These tests write a small raw catalog CSV, train on it through the
//! treadle workflow, and load the published artifacts back.

use std::path::{Path, PathBuf};

use nebula_core::fixtures::sample_songs;
use nebula_etl::pipeline::staging_dir;
use nebula_etl::{build_training_pipeline, execute_training, TrainOptions, TrainingRun};
use nebula_search::{ArtifactPaths, Recommender, RecommenderSettings};
use tempfile::TempDir;

/// Write the sample catalog as raw CSV, with one duplicate and one
/// incomplete row appended.
fn write_raw_csv(dir: &Path) -> PathBuf {
    let path = dir.join("songs.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    let songs = sample_songs();
    for song in &songs {
        writer.serialize(song).unwrap();
    }
    writer.serialize(&songs[0]).unwrap();
    writer
        .write_record([
            "Orphan", "Nobody", "", "single", "pop", "10", "10", "5", "3.0", "1", "False",
        ])
        .unwrap();
    writer.flush().unwrap();
    path
}

async fn train(data_path: PathBuf, model_dir: &Path) -> anyhow::Result<nebula_search::Manifest> {
    let workflow = build_training_pipeline(data_path.clone(), model_dir, TrainOptions::default())?;
    let run = TrainingRun::new(data_path);
    execute_training(&workflow, &run, model_dir).await
}

#[tokio::test]
async fn test_training_publishes_complete_model() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = write_raw_csv(temp_dir.path());
    let model_dir = temp_dir.path().join("model");

    let manifest = train(data_path, &model_dir).await.unwrap();
    assert_eq!(manifest.rows, sample_songs().len());

    let paths = ArtifactPaths::new(&model_dir);
    assert!(paths.missing().is_empty());
    assert!(!staging_dir(&model_dir).exists());

    let recommender = Recommender::load(&paths, RecommenderSettings::default()).unwrap();
    let recs = recommender.recommend("Shape of You", Some(5)).unwrap();
    assert_eq!(recs.len(), 5);
}

#[tokio::test]
async fn test_retraining_runs_every_stage_again() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = write_raw_csv(temp_dir.path());
    let model_dir = temp_dir.path().join("model");

    let first = train(data_path.clone(), &model_dir).await.unwrap();
    let second = train(data_path, &model_dir).await.unwrap();
    assert!(second.trained_at >= first.trained_at);
    assert_eq!(second.rows, first.rows);
}

#[tokio::test]
async fn test_failed_run_leaves_previous_model() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = write_raw_csv(temp_dir.path());
    let model_dir = temp_dir.path().join("model");
    let first = train(data_path, &model_dir).await.unwrap();

    let broken = temp_dir.path().join("broken.csv");
    std::fs::write(&broken, "track_name,artist_name\nA,B\n").unwrap();
    assert!(train(broken, &model_dir).await.is_err());

    let paths = ArtifactPaths::new(&model_dir);
    assert!(paths.missing().is_empty());
    let manifest = nebula_search::Manifest::load(&paths.manifest()).unwrap();
    assert_eq!(manifest, first);
}
