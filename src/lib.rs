//! Stimme Gateway - voice assistant gateway
//!
//! This library chains a speech-to-text collaborator, an LLM agent with
//! tools, and a text-to-speech collaborator behind a CLI, an HTTP API and a
//! Telegram bot:
//! - Bounded per-session conversation history and turn orchestration
//! - Groq chat completions with function-calling tools (web search,
//!   Wikipedia, website fetch, calculator, clock)
//! - Groq Whisper transcription and ElevenLabs synthesis
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Front ends                        │
//! │      CLI      │     HTTP API     │     Telegram     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Turn orchestration                    │
//! │   Session registry  │  Bounded history  │  Timeout  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │             External collaborators                   │
//! │   Whisper (STT)  │  Groq LLM + tools  │  ElevenLabs │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod bot;
pub mod channels;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod reasoning;
pub mod tools;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use history::{History, Role, SessionRegistry, Turn};
pub use orchestrator::Orchestrator;
pub use pipeline::{PipelineOutcome, VoicePipeline};
pub use reasoning::{ConversationContext, GroqEngine, ReasoningEngine};
pub use tools::{SearchResult, ToolSet, WebFetchTool, WebSearchTool, WikipediaTool};
pub use voice::{SpeechToText, TextToSpeech};
