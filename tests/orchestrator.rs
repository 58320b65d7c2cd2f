//! Turn orchestration failure semantics
//!
//! Drives the orchestrator with fake reasoning engines — no network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stimme_gateway::{ConversationContext, Error, Orchestrator, ReasoningEngine, Result, Role};

/// Replies with a fixed prefix of the last user turn
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

/// Always fails like a collaborator outage
struct FailingEngine;

#[async_trait]
impl ReasoningEngine for FailingEngine {
    async fn generate(&self, _context: &ConversationContext) -> Result<String> {
        Err(Error::ReasoningUnavailable("quota exceeded".to_string()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

/// Sleeps past any reasonable timeout
struct SlowEngine;

#[async_trait]
impl ReasoningEngine for SlowEngine {
    async fn generate(&self, _context: &ConversationContext) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok("zu spät".to_string())
    }

    fn model(&self) -> &str {
        "slow"
    }
}

fn orchestrator_with(
    engine: Arc<dyn ReasoningEngine>,
    max_history: usize,
    timeout: Duration,
) -> Orchestrator {
    Orchestrator::new(engine, max_history, "Du bist ein Assistent.".to_string(), timeout)
}

#[tokio::test]
async fn failed_reasoning_leaves_user_turn_only() {
    let orchestrator = orchestrator_with(Arc::new(FailingEngine), 10, Duration::from_secs(5));

    let result = orchestrator.converse("u1", "Hallo").await;
    assert!(matches!(result, Err(Error::ReasoningUnavailable(_))));

    let turns = orchestrator.snapshot("u1").await;
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "Hallo");
}

#[tokio::test]
async fn timeout_maps_to_reasoning_unavailable() {
    let orchestrator = orchestrator_with(Arc::new(SlowEngine), 10, Duration::from_millis(50));

    let result = orchestrator.converse("u1", "Hallo").await;
    assert!(matches!(result, Err(Error::ReasoningUnavailable(_))));

    // The user turn "Hallo" is the only recorded turn
    let turns = orchestrator.snapshot("u1").await;
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].content, "Hallo");
}

#[tokio::test]
async fn successful_turns_accumulate_in_order() {
    let orchestrator = orchestrator_with(Arc::new(EchoEngine), 10, Duration::from_secs(5));

    orchestrator.converse("u1", "eins").await.unwrap();
    orchestrator.converse("u1", "zwei").await.unwrap();

    let contents: Vec<String> = orchestrator
        .snapshot("u1")
        .await
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(contents, vec!["eins", "echo: eins", "zwei", "echo: zwei"]);
}

#[tokio::test]
async fn history_cap_applies_across_turns() {
    let orchestrator = orchestrator_with(Arc::new(EchoEngine), 3, Duration::from_secs(5));

    orchestrator.converse("u1", "A").await.unwrap();
    orchestrator.converse("u1", "B").await.unwrap();

    // Four turns were produced, only the last three survive
    let contents: Vec<String> = orchestrator
        .snapshot("u1")
        .await
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert_eq!(contents, vec!["echo: A", "B", "echo: B"]);
}

#[tokio::test]
async fn sessions_do_not_observe_each_other() {
    let orchestrator = orchestrator_with(Arc::new(EchoEngine), 10, Duration::from_secs(5));

    orchestrator.converse("alice", "Hallo von Alice").await.unwrap();
    orchestrator.converse("bob", "Hallo von Bob").await.unwrap();

    let alice: Vec<String> = orchestrator
        .snapshot("alice")
        .await
        .into_iter()
        .map(|t| t.content)
        .collect();
    assert!(alice.iter().all(|c| !c.contains("Bob")));
    assert_eq!(alice.len(), 2);

    let bob = orchestrator.snapshot("bob").await;
    assert_eq!(bob.len(), 2);
}

#[tokio::test]
async fn reset_clears_a_session_mid_conversation() {
    let orchestrator = orchestrator_with(Arc::new(EchoEngine), 10, Duration::from_secs(5));

    for text in ["eins", "zwei", "drei"] {
        orchestrator.converse("u1", text).await.unwrap();
    }
    assert_eq!(orchestrator.snapshot("u1").await.len(), 6);

    orchestrator.reset("u1").await;
    assert!(orchestrator.snapshot("u1").await.is_empty());

    // The session keeps working after reset
    orchestrator.converse("u1", "neu").await.unwrap();
    assert_eq!(orchestrator.snapshot("u1").await.len(), 2);
}

#[tokio::test]
async fn empty_input_records_nothing() {
    let orchestrator = orchestrator_with(Arc::new(EchoEngine), 10, Duration::from_secs(5));

    assert!(matches!(
        orchestrator.converse("u1", "").await,
        Err(Error::InputInvalid(_))
    ));
    assert!(matches!(
        orchestrator.converse("u1", " \n ").await,
        Err(Error::InputInvalid(_))
    ));
    assert!(orchestrator.snapshot("u1").await.is_empty());
}

#[tokio::test]
async fn concurrent_sessions_proceed_independently() {
    let orchestrator = Arc::new(orchestrator_with(
        Arc::new(EchoEngine),
        10,
        Duration::from_secs(5),
    ));

    let mut handles = Vec::new();
    for user in 0..8 {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("user-{user}");
            for i in 0..5 {
                orchestrator
                    .converse(&key, &format!("nachricht {i}"))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for user in 0..8 {
        let key = format!("user-{user}");
        let turns = orchestrator.snapshot(&key).await;
        assert_eq!(turns.len(), 10);
        // Per-session ordering: user turn then its echo, in sequence
        for i in 0..5 {
            assert_eq!(turns[i * 2].content, format!("nachricht {i}"));
            assert_eq!(turns[i * 2 + 1].content, format!("echo: nachricht {i}"));
        }
    }
}
