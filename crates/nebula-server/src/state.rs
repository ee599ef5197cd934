use axum::extract::FromRef;
use nebula_search::Recommender;
use std::sync::Arc;

use crate::ServerConfig;

pub type SharedRecommender = Arc<Recommender>;

#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub recommender: SharedRecommender,
}

impl ServerState {
    #[must_use]
    pub fn new(config: ServerConfig, recommender: SharedRecommender) -> Self {
        Self {
            config,
            recommender,
        }
    }
}

impl FromRef<ServerState> for SharedRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
