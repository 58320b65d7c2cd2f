//! Bounded conversation history and the per-session registry
//!
//! One `History` per logical conversation. Turns are immutable once
//! appended; the store keeps only the most recent `max_turns` entries and
//! evicts FIFO. Nothing here is persisted — sessions die with the process.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The human speaker
    User,
    /// The assistant
    Agent,
}

impl Role {
    /// Wire name used when building LLM context
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "assistant",
        }
    }
}

/// One utterance in a conversation
#[derive(Debug, Clone)]
pub struct Turn {
    /// Speaker role
    pub role: Role,
    /// Utterance text
    pub content: String,
    /// When the turn was appended
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an agent turn
    #[must_use]
    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded ordered log of turns for one session
#[derive(Debug)]
pub struct History {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl History {
    /// Create an empty history retaining at most `max_turns` entries
    #[must_use]
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns.min(64)),
            max_turns,
        }
    }

    /// Append a turn, evicting the oldest entries once the cap is exceeded
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputInvalid`] for empty or whitespace-only content.
    pub fn append(&mut self, turn: Turn) -> Result<()> {
        if turn.content.trim().is_empty() {
            return Err(Error::InputInvalid("empty turn content".to_string()));
        }

        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
        Ok(())
    }

    /// Remove all turns
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The retained turns, oldest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Number of retained turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Configured retention cap
    #[must_use]
    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }
}

/// Registry mapping session keys to isolated histories
///
/// Each session's history sits behind its own async mutex: holding the lock
/// for a full turn serializes that session while other sessions proceed.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<History>>>>,
    max_turns: usize,
}

impl SessionRegistry {
    /// Create a registry whose histories retain at most `max_turns` entries
    #[must_use]
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_turns,
        }
    }

    /// Get the history for `key`, creating it on first use
    pub async fn session(&self, key: &str) -> Arc<Mutex<History>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(History::new(self.max_turns))))
            .clone()
    }

    /// Clear the history for `key`, if the session exists
    pub async fn reset(&self, key: &str) {
        let handle = {
            let sessions = self.sessions.lock().await;
            sessions.get(key).cloned()
        };
        if let Some(handle) = handle {
            handle.lock().await.clear();
            tracing::debug!(session = key, "history cleared");
        }
    }

    /// Number of sessions seen so far
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether any session exists
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_most_recent_in_order() {
        let mut history = History::new(3);
        for text in ["A", "B", "C", "D"] {
            history.append(Turn::user(text)).unwrap();
        }

        let contents: Vec<String> = history.snapshot().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["B", "C", "D"]);
    }

    #[test]
    fn length_never_exceeds_cap() {
        let mut history = History::new(5);
        for i in 0..50 {
            history.append(Turn::agent(format!("turn {i}"))).unwrap();
            assert!(history.len() <= 5);
        }
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut history = History::new(10);
        for i in 0..5 {
            history.append(Turn::user(format!("turn {i}"))).unwrap();
        }
        assert_eq!(history.len(), 5);

        history.clear();
        assert!(history.snapshot().is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn empty_content_is_rejected() {
        let mut history = History::new(3);
        assert!(history.append(Turn::user("")).is_err());
        assert!(history.append(Turn::user("   \n\t")).is_err());
        assert!(history.is_empty());
    }

    #[test]
    fn roles_survive_eviction() {
        let mut history = History::new(2);
        history.append(Turn::user("frage")).unwrap();
        history.append(Turn::agent("antwort")).unwrap();
        history.append(Turn::user("nachfrage")).unwrap();

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, Role::Agent);
        assert_eq!(snapshot[1].role, Role::User);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let registry = SessionRegistry::new(10);

        let alice = registry.session("alice").await;
        alice.lock().await.append(Turn::user("hallo")).unwrap();

        let bob = registry.session("bob").await;
        assert!(bob.lock().await.is_empty());

        // Same key returns the same history
        let alice_again = registry.session("alice").await;
        assert_eq!(alice_again.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_only_that_session() {
        let registry = SessionRegistry::new(10);

        for key in ["a", "b"] {
            let session = registry.session(key).await;
            let mut history = session.lock().await;
            history.append(Turn::user("eins")).unwrap();
            history.append(Turn::agent("zwei")).unwrap();
        }

        registry.reset("a").await;

        assert!(registry.session("a").await.lock().await.is_empty());
        assert_eq!(registry.session("b").await.lock().await.len(), 2);
    }

    #[test]
    fn reset_unknown_session_is_a_noop() {
        tokio_test::block_on(async {
            let registry = SessionRegistry::new(10);
            registry.reset("ghost").await;
            assert!(registry.is_empty().await);
        });
    }
}
