use anyhow::{Context, Result};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use nebula_core::model::RecommendedTrack;
use nebula_search::{ArtistSongs, Recommender};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http_layers::log_requests;
use crate::state::{ServerState, SharedRecommender};
use crate::ServerConfig;

pub const HEALTH_MESSAGE: &str = "Nebula Sound API is running";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct TrackQuery {
    track_name: String,
}

#[derive(Debug, Deserialize)]
struct ArtistQuery {
    artist_name: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistQuery {
    track_name: String,
    size: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    /// The query as sent.
    pub track_name: String,
    pub recommendations: Vec<RecommendedTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub track_name: String,
    pub playlist: Vec<RecommendedTrack>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: HEALTH_MESSAGE.to_string(),
    })
}

async fn recommend(
    State(recommender): State<SharedRecommender>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let recommendations = recommender.recommend(&query.track_name, None)?;
    Ok(Json(RecommendResponse {
        track_name: query.track_name,
        recommendations,
    }))
}

async fn search_by_artist(
    State(recommender): State<SharedRecommender>,
    Query(query): Query<ArtistQuery>,
) -> Result<Json<ArtistSongs>, ApiError> {
    Ok(Json(recommender.songs_by_artist(&query.artist_name)?))
}

async fn playlist(
    State(recommender): State<SharedRecommender>,
    Query(query): Query<PlaylistQuery>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = recommender.generate_playlist(&query.track_name, query.size)?;
    Ok(Json(PlaylistResponse {
        track_name: query.track_name,
        playlist,
    }))
}

/// Build the router over an already loaded recommender.
pub fn make_app(config: ServerConfig, recommender: Arc<Recommender>) -> Router {
    let state = ServerState::new(config, recommender);

    Router::new()
        .route("/health", get(health))
        .route("/recommend", get(recommend))
        .route("/artist", get(search_by_artist))
        .route("/playlist", get(playlist))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    log::info!("Shutting down");
}

/// Serve the API until interrupted.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(config: ServerConfig, recommender: Arc<Recommender>) -> Result<()> {
    let address = config.bind_address();
    let app = make_app(config, recommender);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    log::info!("Nebula Sound API listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use nebula_search::fixtures::sample_recommender;
    use tower::ServiceExt; // for `oneshot`

    fn app() -> Router {
        make_app(
            ServerConfig::default(),
            Arc::new(sample_recommender().unwrap()),
        )
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], HEALTH_MESSAGE);
    }

    #[tokio::test]
    async fn test_recommend_returns_five() {
        let (status, body) = get_json("/recommend?track_name=Shape%20of%20You").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["track_name"], "Shape of You");

        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 5);
        for rec in recs {
            assert_ne!(rec["track_name"], "Shape of You");
            assert!(rec["artist_name"].is_string());
            assert!(rec["album_name"].is_string());
        }
    }

    #[tokio::test]
    async fn test_recommend_unknown_is_404() {
        let (status, body) = get_json("/recommend?track_name=zzzzqqqq123").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].as_str().unwrap().contains("zzzzqqqq123"));
    }

    #[tokio::test]
    async fn test_artist_resolves() {
        let (status, body) = get_json("/artist?artist_name=ed%20sheeran").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["artist_name"], "Ed Sheeran");

        let songs = body["songs"].as_array().unwrap();
        assert_eq!(songs.len(), 3);
        assert!(songs.iter().all(|s| s["track_popularity"].is_u64()));
    }

    #[tokio::test]
    async fn test_artist_with_extra_whitespace_resolves() {
        let (status, body) = get_json("/artist?artist_name=%20%20ed%20%20%20sheeran%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["artist_name"], "Ed Sheeran");
        assert_eq!(body["songs"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_artist_unknown_is_404() {
        let (status, body) = get_json("/artist?artist_name=zzzzqqqq123").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_playlist_default_and_explicit_size() {
        let (status, body) = get_json("/playlist?track_name=Starboy").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlist"].as_array().unwrap().len(), 10);

        let (_, body) = get_json("/playlist?track_name=Starboy&size=3").await;
        assert_eq!(body["playlist"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400() {
        let (status, _) = get_json("/recommend").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
