//! Error types for the Stimme gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Stimme gateway
///
/// The first three variants form the user-facing taxonomy: every failure of
/// an external collaborator is mapped onto one of them at the adapter
/// boundary. The remaining variants cover configuration and transport
/// plumbing.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any collaborator was called (empty text,
    /// empty or undecodable audio)
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// The reasoning collaborator failed (transport error, malformed
    /// response, quota, timeout)
    #[error("reasoning unavailable: {0}")]
    ReasoningUnavailable(String),

    /// The speech-synthesis collaborator failed
    #[error("synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    /// Configuration error (missing credentials, bad values)
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging channel error (Telegram API failures)
    #[error("channel error: {0}")]
    Channel(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
