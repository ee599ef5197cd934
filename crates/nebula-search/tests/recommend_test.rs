//! End-to-end tests of the recommender over artifacts written to disk.

use nebula_core::fixtures::sample_songs;
use nebula_core::schema::Database;
use nebula_search::artifacts::save_gzip_json;
use nebula_search::index::DEFAULT_NEIGHBORS;
use nebula_search::{
    ArtifactPaths, FeatureBuilder, Manifest, NeighborIndex, Recommender, RecommenderSettings,
    SearchError,
};
use tempfile::TempDir;

/// Write a complete artifact set for the sample catalog.
fn write_artifacts(dir: &TempDir) -> ArtifactPaths {
    let paths = ArtifactPaths::new(dir.path());
    let songs = sample_songs();

    let db = Database::open(paths.catalog()).expect("open catalog db");
    db.replace_songs(&songs).expect("write songs");

    let features = FeatureBuilder::fit(&songs, 5000).expect("fit features");
    let vectors = features.build_all(&songs).expect("build vectors");
    let index = NeighborIndex::fit(vectors, features.text_width(), DEFAULT_NEIGHBORS)
        .expect("fit index");

    save_gzip_json(features.vectorizer(), &paths.vectorizer()).unwrap();
    save_gzip_json(features.scaler(), &paths.scaler()).unwrap();
    save_gzip_json(&index, &paths.neighbors()).unwrap();
    Manifest::new(songs.len(), features.text_width(), DEFAULT_NEIGHBORS)
        .save(&paths.manifest())
        .unwrap();
    paths
}

fn load(dir: &TempDir) -> Recommender {
    let paths = write_artifacts(dir);
    Recommender::load(&paths, RecommenderSettings::default()).expect("load recommender")
}

#[test]
fn test_shape_of_you_five_recommendations() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);

    let recs = recommender.recommend("Shape of You", Some(5)).unwrap();
    assert_eq!(recs.len(), 5);
    for track in &recs {
        assert_ne!(track.track_name, "Shape of You");
        assert!(!track.track_name.is_empty());
        assert!(!track.artist_name.is_empty());
        assert!(!track.album_name.is_empty());
    }
}

#[test]
fn test_artist_resolves_to_canonical_name() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);

    let result = recommender.songs_by_artist("ed sheeran").unwrap();
    assert_eq!(result.artist_name, "Ed Sheeran");
    let names: Vec<_> = result.songs.iter().map(|s| s.track_name.as_str()).collect();
    assert_eq!(names, vec!["Shape of You", "Perfect", "Castle on the Hill"]);
    assert!(result.songs.iter().all(|s| s.track_popularity > 0));
}

#[test]
fn test_unmatched_query_is_not_found() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);

    let err = recommender.recommend("zzzzqqqq123", None).unwrap_err();
    assert!(matches!(err, SearchError::NotFound { .. }));
    assert!(err.to_string().contains("zzzzqqqq123"));
}

#[test]
fn test_results_are_ordered_and_stable() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);

    let first = recommender.similar("Starboy", 8).unwrap();
    let second = recommender.similar("Starboy", 8).unwrap();
    assert_eq!(first, second);
    for pair in first.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }

    assert_eq!(
        recommender.generate_playlist("Starboy", Some(8)).unwrap(),
        recommender.generate_playlist("Starboy", Some(8)).unwrap()
    );
}

#[test]
fn test_count_at_least_catalog_size() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);
    let size = recommender.catalog().len();

    let playlist = recommender.generate_playlist("Hello", Some(size)).unwrap();
    assert_eq!(playlist.len(), size - 1);
    assert!(playlist.iter().all(|t| t.track_name != "Hello"));
}

#[test]
fn test_manifest_is_loaded() {
    let dir = TempDir::new().unwrap();
    let recommender = load(&dir);

    let manifest = recommender.manifest().expect("manifest present");
    assert_eq!(manifest.rows, recommender.catalog().len());
    assert_eq!(manifest.neighbors, DEFAULT_NEIGHBORS);
}

#[test]
fn test_missing_artifact_fails_load() {
    let dir = TempDir::new().unwrap();
    let paths = write_artifacts(&dir);
    std::fs::remove_file(paths.scaler()).unwrap();

    let err = Recommender::load(&paths, RecommenderSettings::default()).unwrap_err();
    assert!(err.is_config());
}
