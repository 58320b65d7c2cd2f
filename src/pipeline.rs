//! Full voice pipeline: audio in, text and audio out
//!
//! Chains transcription, orchestration and synthesis for one session turn.
//! Synthesis failures after a successful conversation turn are surfaced as
//! errors, but the turn itself is already recorded in history.

use std::sync::Arc;

use crate::orchestrator::Orchestrator;
use crate::voice::{SpeechToText, TextToSpeech};
use crate::Result;

/// Outcome of one voice pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// What the user said
    pub transcription: String,
    /// What the assistant replied
    pub response: String,
    /// Synthesized reply (MP3), absent when synthesis was skipped
    pub audio: Option<Vec<u8>>,
}

/// Audio → text → reasoning → speech
pub struct VoicePipeline {
    stt: SpeechToText,
    tts: TextToSpeech,
    orchestrator: Arc<Orchestrator>,
}

impl VoicePipeline {
    /// Create a pipeline sharing the given orchestrator
    #[must_use]
    pub fn new(stt: SpeechToText, tts: TextToSpeech, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            stt,
            tts,
            orchestrator,
        }
    }

    /// Run the full pipeline for one audio message.
    ///
    /// `filename` hints the audio container for the transcription upload.
    /// Pass `synthesize = false` to skip the TTS step (text-only reply).
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InputInvalid`] for empty/corrupt audio or failed
    ///   transcription
    /// - [`crate::Error::ReasoningUnavailable`] when the reasoning call fails
    /// - [`crate::Error::SynthesisUnavailable`] when the TTS call fails
    pub async fn process(
        &self,
        session_key: &str,
        audio: &[u8],
        filename: &str,
        synthesize: bool,
    ) -> Result<PipelineOutcome> {
        let transcription = self.stt.transcribe(audio, filename).await?;

        if transcription.is_empty() {
            return Err(crate::Error::InputInvalid(
                "no speech recognized".to_string(),
            ));
        }

        let response = self.orchestrator.converse(session_key, &transcription).await?;

        let audio = if synthesize {
            Some(self.tts.synthesize(&response).await?)
        } else {
            None
        };

        Ok(PipelineOutcome {
            transcription,
            response,
            audio,
        })
    }

    /// The shared orchestrator (for text turns and resets)
    #[must_use]
    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Synthesize arbitrary text with the pipeline's voice
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SynthesisUnavailable`] on collaborator failure
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.tts.synthesize(text).await
    }
}
