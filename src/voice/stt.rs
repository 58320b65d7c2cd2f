//! Speech-to-text (STT) processing
//!
//! Whisper served over Groq's OpenAI-compatible transcription endpoint.

use crate::{Error, Result};

const TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";

/// Response from the transcription API
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    model: String,
    language: String,
}

impl SpeechToText {
    /// Create a new STT instance.
    ///
    /// `language` is the target language tag passed to Whisper (e.g. "de").
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, model: String, language: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Groq API key required for transcription".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            language,
        })
    }

    /// Transcribe audio bytes to text.
    ///
    /// Accepts any container Whisper understands (OGG, MP3, WAV, ...).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputInvalid`] for empty audio or when the
    /// collaborator fails — corrupt audio and transport failures are
    /// indistinguishable to the caller per the error taxonomy.
    pub async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::InputInvalid("empty audio buffer".to_string()));
        }

        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_for_filename(filename))
            .map_err(|e| Error::InputInvalid(format!("bad audio mime: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::InputInvalid(format!("transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::InputInvalid(format!(
                "transcription API error {status}: {body}"
            )));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| Error::InputInvalid(format!("malformed transcription response: {e}")))?;

        let text = result.text.trim().to_string();
        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }
}

/// Best-effort MIME type from the audio filename extension
fn mime_for_filename(filename: &str) -> &'static str {
    match filename.rsplit('.').next().unwrap_or_default() {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => "audio/ogg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let result = SpeechToText::new(String::new(), "whisper-large-v3".to_string(), "de".to_string());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn empty_audio_is_rejected_without_a_request() {
        let stt = SpeechToText::new("key".to_string(), "whisper-large-v3".to_string(), "de".to_string()).unwrap();
        let result = stt.transcribe(&[], "audio.ogg").await;
        assert!(matches!(result, Err(Error::InputInvalid(_))));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_filename("reply.mp3"), "audio/mpeg");
        assert_eq!(mime_for_filename("clip.wav"), "audio/wav");
        assert_eq!(mime_for_filename("voice.ogg"), "audio/ogg");
        assert_eq!(mime_for_filename("noext"), "audio/ogg");
    }
}
