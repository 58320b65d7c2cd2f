//! Text-to-speech (TTS) processing
//!
//! ElevenLabs synthesis; returns MP3 bytes (44.1 kHz, 128 kbps).

use crate::{Error, Result};

/// Output format requested from ElevenLabs
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model: String,
}

impl TextToSpeech {
    /// Create a new TTS instance.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, voice_id: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
            model,
        })
    }

    /// Synthesize text to speech.
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns [`Error::SynthesisUnavailable`] on any collaborator failure
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SynthesisRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        if text.trim().is_empty() {
            return Err(Error::InputInvalid("empty text".to_string()));
        }

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}?output_format={OUTPUT_FORMAT}",
            self.voice_id
        );

        let request = SynthesisRequest {
            text,
            model_id: &self.model,
        };

        tracing::debug!(chars = text.len(), voice = %self.voice_id, "synthesizing speech");

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::SynthesisUnavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(Error::SynthesisUnavailable(format!(
                "ElevenLabs error {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::SynthesisUnavailable(format!("response read failed: {e}")))?;

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
