//! Turn orchestration over bounded session histories
//!
//! One sequential request/response cycle per session: validate input, record
//! the user turn, call the reasoning collaborator under a timeout, record the
//! agent turn. A failed call leaves the user turn in place and records no
//! agent turn, so the log stays consistent.

use std::sync::Arc;
use std::time::Duration;

use crate::history::{SessionRegistry, Turn};
use crate::reasoning::{ConversationContext, ReasoningEngine};
use crate::{Error, Result};

/// Drives conversation turns against the reasoning collaborator
pub struct Orchestrator {
    engine: Arc<dyn ReasoningEngine>,
    sessions: SessionRegistry,
    system_prompt: String,
    call_timeout: Duration,
}

impl Orchestrator {
    /// Create an orchestrator with its own session registry
    #[must_use]
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        max_history: usize,
        system_prompt: String,
        call_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            sessions: SessionRegistry::new(max_history),
            system_prompt,
            call_timeout,
        }
    }

    /// Run one conversation turn for `session_key`.
    ///
    /// The session's history is locked for the whole turn, so a session's
    /// turns are never interleaved with themselves; distinct sessions
    /// proceed in parallel.
    ///
    /// # Errors
    ///
    /// - [`Error::InputInvalid`] for empty input (nothing is recorded)
    /// - [`Error::ReasoningUnavailable`] when the collaborator fails or the
    ///   timeout expires (the user turn stays recorded)
    pub async fn converse(&self, session_key: &str, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InputInvalid("empty message".to_string()));
        }

        let session = self.sessions.session(session_key).await;
        let mut history = session.lock().await;

        history.append(Turn::user(input))?;

        let context = ConversationContext {
            system_prompt: self.system_prompt.clone(),
            turns: history.snapshot(),
        };

        tracing::debug!(
            session = session_key,
            turns = context.turns.len(),
            model = self.engine.model(),
            "invoking reasoning collaborator"
        );

        let reply = match tokio::time::timeout(self.call_timeout, self.engine.generate(&context))
            .await
        {
            Err(_) => {
                tracing::warn!(
                    session = session_key,
                    timeout_secs = self.call_timeout.as_secs(),
                    "reasoning call timed out"
                );
                return Err(Error::ReasoningUnavailable(format!(
                    "timed out after {}s",
                    self.call_timeout.as_secs()
                )));
            }
            Ok(Err(e)) => {
                tracing::warn!(session = session_key, error = %e, "reasoning call failed");
                return Err(match e {
                    Error::ReasoningUnavailable(_) => e,
                    other => Error::ReasoningUnavailable(other.to_string()),
                });
            }
            Ok(Ok(reply)) => reply,
        };

        history.append(Turn::agent(reply.clone()))?;

        tracing::info!(
            session = session_key,
            reply_chars = reply.len(),
            "turn complete"
        );

        Ok(reply)
    }

    /// Clear the history for `session_key`
    pub async fn reset(&self, session_key: &str) {
        self.sessions.reset(session_key).await;
        tracing::info!(session = session_key, "session reset");
    }

    /// Snapshot a session's history (empty for unknown sessions)
    pub async fn snapshot(&self, session_key: &str) -> Vec<Turn> {
        self.sessions.session(session_key).await.lock().await.snapshot()
    }

    /// Model identifier of the underlying engine
    #[must_use]
    pub fn model(&self) -> &str {
        self.engine.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoEngine;

    #[async_trait]
    impl ReasoningEngine for EchoEngine {
        async fn generate(&self, context: &ConversationContext) -> Result<String> {
            let last = context.turns.last().expect("context never empty");
            Ok(format!("echo: {}", last.content))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn orchestrator(max_history: usize) -> Orchestrator {
        Orchestrator::new(
            Arc::new(EchoEngine),
            max_history,
            "prompt".to_string(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn successful_turn_records_both_sides() {
        let orchestrator = orchestrator(10);
        let reply = orchestrator.converse("u1", "Hallo").await.unwrap();
        assert_eq!(reply, "echo: Hallo");

        let turns = orchestrator.snapshot("u1").await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "Hallo");
        assert_eq!(turns[1].content, "echo: Hallo");
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_recording() {
        let orchestrator = orchestrator(10);
        let result = orchestrator.converse("u1", "   ").await;
        assert!(matches!(result, Err(Error::InputInvalid(_))));
        assert!(orchestrator.snapshot("u1").await.is_empty());
    }

    #[tokio::test]
    async fn input_is_trimmed_before_recording() {
        let orchestrator = orchestrator(10);
        orchestrator.converse("u1", "  Hallo \n").await.unwrap();
        let turns = orchestrator.snapshot("u1").await;
        assert_eq!(turns[0].content, "Hallo");
    }
}
