use anyhow::Result;
use nebula_etl::Config;
use nebula_server::{run_server, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;

use super::load_recommender;

/// Merge CLI overrides over the configured bind address.
pub fn server_config(
    config: &Config,
    host: Option<String>,
    port: Option<u16>,
    requests_logging_level: RequestsLoggingLevel,
) -> ServerConfig {
    ServerConfig {
        requests_logging_level,
        host: host.unwrap_or_else(|| config.host.clone()),
        port: port.unwrap_or(config.port),
    }
}

pub async fn run_serve(config: &Config, server_config: ServerConfig) -> Result<()> {
    let recommender = load_recommender(config)?;
    log::info!(
        "Loaded {} songs from {}",
        recommender.catalog().len(),
        config.model_dir.display()
    );
    run_server(server_config, Arc::new(recommender)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let config = Config::default();
        let server = server_config(
            &config,
            Some("0.0.0.0".to_string()),
            None,
            RequestsLoggingLevel::Headers,
        );
        assert_eq!(server.bind_address(), "0.0.0.0:8000");
        assert_eq!(server.requests_logging_level, RequestsLoggingLevel::Headers);
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = Config {
            port: 9100,
            ..Config::default()
        };
        let server = server_config(&config, None, None, RequestsLoggingLevel::Path);
        assert_eq!(server.bind_address(), "127.0.0.1:9100");
    }
}
