use anyhow::{Context, Result};
use confyg::{env, Confygery};
use nebula_search::features::DEFAULT_MAX_FEATURES;
use nebula_search::index::DEFAULT_NEIGHBORS;
use nebula_search::matcher::DEFAULT_MATCH_THRESHOLD;
use nebula_search::recommender::{DEFAULT_PLAYLIST_SIZE, DEFAULT_RECOMMENDATIONS};
use nebula_search::RecommenderSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::TrainOptions;

/// Configuration for nebula-sound.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (NEBULA_* prefix)
/// 3. Config file (~/.config/nebula-sound/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw catalog CSV used by `nebula train`.
    ///
    /// Can be set via:
    /// - CLI: nebula train --data /path/to/songs.csv
    /// - ENV: NEBULA_DATA_PATH
    /// - Config: data_path = "/path/to/songs.csv"
    pub data_path: PathBuf,

    /// Directory holding the trained artifacts.
    ///
    /// Can be set via:
    /// - CLI: --model-dir /path/to/models
    /// - ENV: NEBULA_MODEL_DIR
    /// - Default: ~/.local/share/nebula-sound/model
    pub model_dir: PathBuf,

    /// HTTP bind address.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// Minimum fuzzy score (0-100) for a name to resolve.
    pub match_threshold: f64,

    /// Default number of recommendations.
    pub recommendations: usize,

    /// Default playlist size.
    pub playlist_size: usize,

    /// Vocabulary cap for the text vectorizer.
    pub max_features: usize,

    /// Default neighbor count stored with the index.
    pub neighbors: usize,

    /// Log filter used when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data").join("spotify_songs.csv"),
            model_dir: default_model_dir(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            recommendations: DEFAULT_RECOMMENDATIONS,
            playlist_size: DEFAULT_PLAYLIST_SIZE,
            max_features: DEFAULT_MAX_FEATURES,
            neighbors: DEFAULT_NEIGHBORS,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/nebula-sound/config.toml
    /// Reads environment variables with NEBULA_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("nebula");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with a custom model directory.
    ///
    /// This is used when the --model-dir CLI flag is provided.
    pub fn load_with_model_dir(model_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(model_dir) = model_dir {
            config.model_dir = model_dir;
        }
        Ok(config)
    }

    /// Reject values no component can work with.
    ///
    /// # Errors
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.match_threshold) {
            anyhow::bail!(
                "match_threshold must be between 0 and 100, got {}",
                self.match_threshold
            );
        }
        if self.max_features == 0 {
            anyhow::bail!("max_features must be at least 1");
        }
        if self.neighbors == 0 {
            anyhow::bail!("neighbors must be at least 1");
        }
        Ok(())
    }

    /// Query-time settings for the recommender.
    #[must_use]
    pub fn recommender_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            match_threshold: self.match_threshold,
            recommendations: self.recommendations,
            playlist_size: self.playlist_size,
        }
    }

    /// Fit-time settings for the training pipeline.
    #[must_use]
    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            max_features: self.max_features,
            neighbors: self.neighbors,
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}

/// Get the default model directory.
///
/// Returns: ~/.local/share/nebula-sound/model (or platform equivalent)
fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nebula-sound")
        .join("model")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/nebula-sound/config.toml
/// - macOS: ~/Library/Application Support/nebula-sound/config.toml
/// - Windows: %APPDATA%\nebula-sound\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nebula-sound")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Nebula Sound Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (NEBULA_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Raw catalog CSV read by `nebula train`
#
# Can also be set via:
# - CLI: nebula train --data /path/to/songs.csv
# - Environment: NEBULA_DATA_PATH=/path/to/songs.csv
#data_path = "data/spotify_songs.csv"

# Directory holding the trained model artifacts
#
# Can also be set via:
# - CLI: nebula --model-dir /custom/model serve
# - Environment: NEBULA_MODEL_DIR=/custom/model
#
# Default: Platform-specific data directory
#model_dir = "/path/to/model"

# HTTP server bind address and port
#host = "127.0.0.1"
#port = 8000

# Minimum fuzzy match score (0-100) for a track or artist name to resolve
#match_threshold = 60.0

# Default number of recommendations and playlist length
#recommendations = 5
#playlist_size = 10

# Training: vocabulary cap and neighbor count stored with the index
#max_features = 5000
#neighbors = 11

# Log filter used when RUST_LOG is not set
#log_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.model_dir.as_os_str().is_empty());
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "127.0.0.1");
        assert!((config.match_threshold - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.recommendations, 5);
        assert_eq!(config.playlist_size, 10);
        assert_eq!(config.max_features, 5000);
        assert_eq!(config.neighbors, 11);
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_model_dir() {
        let custom = PathBuf::from("/tmp/nebula-model");
        let config = Config::load_with_model_dir(Some(custom.clone())).unwrap();
        assert_eq!(config.model_dir, custom);
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("port = 9000\nneighbors = 21\n").unwrap();
        assert_eq!(parsed.port, 9000);
        assert_eq!(parsed.neighbors, 21);
        assert_eq!(parsed.playlist_size, 10);
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            match_threshold: 150.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            neighbors: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
