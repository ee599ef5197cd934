//! HTTP API for nebula-sound.
//!
//! Serves `/health`, `/recommend`, `/artist` and `/playlist` over a
//! recommender loaded once at startup.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

mod config;
mod error;
mod http_layers;
mod server;
mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use http_layers::RequestsLoggingLevel;
pub use server::{make_app, run_server, HealthResponse, PlaylistResponse, RecommendResponse};
pub use state::ServerState;
