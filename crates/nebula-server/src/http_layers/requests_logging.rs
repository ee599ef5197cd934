//! Request logging middleware

use axum::extract::State;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::state::ServerState;

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level;
    let start = Instant::now();

    if level > RequestsLoggingLevel::None {
        log::info!(">>> {} {}", request.method(), request.uri());
    }

    if level >= RequestsLoggingLevel::Headers {
        log::info!("  Req Headers:");
        for (name, value) in request.headers() {
            log::info!("    {name:?}: {value:?}");
        }
    }

    let response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log::info!("  Resp Headers:");
        for (name, value) in response.headers() {
            log::info!("    {name:?}: {value:?}");
        }
    }

    if level > RequestsLoggingLevel::None {
        log::info!(
            "<<< {} ({}ms)",
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(RequestsLoggingLevel::None < RequestsLoggingLevel::Path);
        assert!(RequestsLoggingLevel::Path < RequestsLoggingLevel::Headers);
        assert_eq!(RequestsLoggingLevel::default(), RequestsLoggingLevel::Path);
    }
}
