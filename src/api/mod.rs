//! HTTP API server
//!
//! JSON front end over the same orchestration path as the CLI and the bot:
//! text chat, voice turns (audio in, text + audio out) and session reset.

pub mod chat;
pub mod health;
pub mod voice;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::orchestrator::Orchestrator;
use crate::pipeline::VoicePipeline;
use crate::{Error, Result};

/// Session key used when a request does not name one
pub const DEFAULT_SESSION: &str = "api";

/// Shared state for API handlers
pub struct ApiState {
    /// Turn orchestrator (text path)
    pub orchestrator: Arc<Orchestrator>,
    /// Voice pipeline (audio path)
    pub pipeline: Arc<VoicePipeline>,
}

/// Build the API router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(chat::router(state.clone()))
        .merge(voice::router(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the API on the given port
///
/// # Errors
///
/// Returns error if the listener cannot bind
pub async fn serve(state: Arc<ApiState>, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Error body rendered for failed API calls
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// API error wrapper mapping the crate taxonomy onto HTTP statuses
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            Error::InputInvalid(_) => (StatusCode::BAD_REQUEST, "input_invalid"),
            Error::ReasoningUnavailable(_) => (StatusCode::BAD_GATEWAY, "reasoning_unavailable"),
            Error::SynthesisUnavailable(_) => (StatusCode::BAD_GATEWAY, "synthesis_unavailable"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.0.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_matches_taxonomy() {
        let cases = [
            (Error::InputInvalid("x".to_string()), StatusCode::BAD_REQUEST),
            (
                Error::ReasoningUnavailable("x".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                Error::SynthesisUnavailable("x".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                Error::Config("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = ApiError(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
