//! Configuration for the Stimme gateway
//!
//! Everything is environment-driven. Credentials keep the names the
//! upstream services document (`GROQ_API_KEY`, `ELEVENLABS_API_KEY`,
//! `TELEGRAM_BOT_TOKEN`); gateway tuning lives under `STIMME_*`.

use std::time::Duration;

use crate::{Error, Result};

/// Default chat model served by Groq
pub const DEFAULT_CHAT_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Default transcription model served by Groq
pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3";

/// Default ElevenLabs synthesis model
pub const DEFAULT_TTS_MODEL: &str = "eleven_flash_v2_5";

/// Default ElevenLabs voice identifier
pub const DEFAULT_VOICE_ID: &str = "z1EhmmPwF0ENGYE8dBE6";

/// Default number of retained history turns (10 exchanges)
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// Default per-call timeout for external collaborators
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default cap on tool-call rounds per turn
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 6;

/// Web search provider credentials
#[derive(Debug, Clone)]
pub enum SearchCredentials {
    /// Brave Search API key
    Brave(String),
    /// Serper (Google) API key
    Serper(String),
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Groq API key (chat completions and Whisper transcription)
    pub groq_api_key: String,

    /// ElevenLabs API key (speech synthesis)
    pub elevenlabs_api_key: String,

    /// Telegram bot token (required only for the bot front end)
    pub telegram_token: Option<String>,

    /// Web search credentials (tool disabled when absent)
    pub search: Option<SearchCredentials>,

    /// Chat model identifier
    pub chat_model: String,

    /// Transcription model identifier
    pub stt_model: String,

    /// Synthesis model identifier
    pub tts_model: String,

    /// Synthesis voice identifier
    pub voice_id: String,

    /// Target language tag (BCP-47 primary subtag, e.g. "de")
    pub language: String,

    /// Maximum retained history turns per session
    pub max_history: usize,

    /// Per-call timeout for external collaborators
    pub request_timeout: Duration,

    /// Maximum tool-call rounds per reasoning turn
    pub max_tool_rounds: u32,

    /// Sampling temperature for the chat model
    pub temperature: f32,

    /// Completion token cap for the chat model
    pub max_tokens: u32,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails fast before any session is accepted when a required credential
    /// is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `GROQ_API_KEY` or `ELEVENLABS_API_KEY`
    /// is unset, or if a numeric override cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let groq_api_key = require_env("GROQ_API_KEY")?;
        let elevenlabs_api_key = require_env("ELEVENLABS_API_KEY")?;

        let search = std::env::var("BRAVE_SEARCH_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SearchCredentials::Brave)
            .or_else(|| {
                std::env::var("SERPER_API_KEY")
                    .ok()
                    .filter(|k| !k.is_empty())
                    .map(SearchCredentials::Serper)
            });

        Ok(Self {
            groq_api_key,
            elevenlabs_api_key,
            telegram_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            search,
            chat_model: env_or("STIMME_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            stt_model: env_or("STIMME_STT_MODEL", DEFAULT_STT_MODEL),
            tts_model: env_or("STIMME_TTS_MODEL", DEFAULT_TTS_MODEL),
            voice_id: env_or("STIMME_VOICE_ID", DEFAULT_VOICE_ID),
            language: env_or("STIMME_LANGUAGE", "de"),
            max_history: parse_env("STIMME_MAX_HISTORY", DEFAULT_MAX_HISTORY)?,
            request_timeout: Duration::from_secs(parse_env(
                "STIMME_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            max_tool_rounds: parse_env("STIMME_MAX_TOOL_ROUNDS", DEFAULT_MAX_TOOL_ROUNDS)?,
            temperature: parse_env("STIMME_TEMPERATURE", 0.7)?,
            max_tokens: parse_env("STIMME_MAX_TOKENS", 1000)?,
        })
    }

    /// The Telegram token, or a config error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `TELEGRAM_BOT_TOKEN` was not set.
    pub fn telegram_token(&self) -> Result<&str> {
        self.telegram_token
            .as_deref()
            .ok_or_else(|| Error::Config("TELEGRAM_BOT_TOKEN not set".to_string()))
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{name} not set")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| Error::Config(format!("{name} has invalid value: {raw}"))),
        _ => Ok(default),
    }
}
