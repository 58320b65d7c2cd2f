//! Text chat and session reset endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState, DEFAULT_SESSION};

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/reset", post(reset))
        .with_state(state)
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Session key; omitted requests share one session
    pub session_id: Option<String>,
    /// User message
    pub message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Run one text turn
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let session = request.session_id.as_deref().unwrap_or(DEFAULT_SESSION);

    let response = state
        .orchestrator
        .converse(session, &request.message)
        .await?;

    Ok(Json(ChatResponse { response }))
}

/// Reset request
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session_id: Option<String>,
}

/// Clear a session's history
async fn reset(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ResetRequest>,
) -> StatusCode {
    let session = request.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    state.orchestrator.reset(session).await;
    StatusCode::NO_CONTENT
}
