//! Voice processing (speech-to-text and text-to-speech adapters)

pub mod stt;
pub mod tts;

pub use stt::SpeechToText;
pub use tts::TextToSpeech;
