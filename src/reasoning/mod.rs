//! Reasoning collaborator abstraction
//!
//! The orchestrator talks to an opaque `generate(context) -> response`
//! capability. The production implementation is [`GroqEngine`]; tests plug
//! in fakes through the same trait.

mod groq;

use async_trait::async_trait;

pub use groq::GroqEngine;

use crate::history::Turn;
use crate::Result;

/// Bounded conversational context for one reasoning call
///
/// `turns` is the history snapshot, oldest first, with the new user turn
/// already appended at the end.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    /// System instruction for the collaborator
    pub system_prompt: String,
    /// Ordered turns, ending with the current user turn
    pub turns: Vec<Turn>,
}

/// External capability that produces a response from conversational context
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Generate the assistant response for the given context.
    ///
    /// # Errors
    ///
    /// Implementations map every failure (transport, malformed response,
    /// quota) to [`crate::Error::ReasoningUnavailable`].
    async fn generate(&self, context: &ConversationContext) -> Result<String>;

    /// Model identifier, for logging and status reporting
    fn model(&self) -> &str;
}
