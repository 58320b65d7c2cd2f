//! Voice turn endpoint (audio in, text and audio out)

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState, DEFAULT_SESSION};
use crate::Error;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/voice", post(voice_turn))
        .with_state(state)
}

/// Voice turn query parameters
#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    /// Session key; omitted requests share one session
    pub session_id: Option<String>,
    /// Audio filename hint for container detection (default "audio.ogg")
    pub filename: Option<String>,
    /// Skip synthesis and return text only
    pub text_only: Option<bool>,
}

/// Voice turn response
#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub transcription: String,
    pub response: String,
    /// Synthesized MP3 reply, base64-encoded; absent for text-only turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
}

/// Run one voice turn over the raw audio body
async fn voice_turn(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<VoiceQuery>,
    body: Bytes,
) -> Result<Json<VoiceResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError(Error::InputInvalid("empty audio body".to_string())));
    }

    let session = query.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    let filename = query.filename.as_deref().unwrap_or("audio.ogg");
    let synthesize = !query.text_only.unwrap_or(false);

    let outcome = state
        .pipeline
        .process(session, &body, filename, synthesize)
        .await?;

    let audio_b64 = outcome
        .audio
        .map(|audio| base64::engine::general_purpose::STANDARD.encode(audio));

    Ok(Json(VoiceResponse {
        transcription: outcome.transcription,
        response: outcome.response,
        audio_b64,
    }))
}
