//! History store and session isolation properties

use stimme_gateway::{History, Role, SessionRegistry, Turn};

#[test]
fn retained_turns_are_the_most_recent_in_order() {
    let mut history = History::new(3);
    for text in ["A", "B", "C", "D"] {
        history.append(Turn::user(text)).unwrap();
    }

    let contents: Vec<String> = history.snapshot().into_iter().map(|t| t.content).collect();
    assert_eq!(contents, vec!["B", "C", "D"]);
}

#[test]
fn cap_holds_after_every_append() {
    let mut history = History::new(4);
    for i in 0..100 {
        history.append(Turn::agent(format!("turn {i}"))).unwrap();
        assert!(history.len() <= 4, "cap violated after append {i}");
    }

    // The survivors are exactly the last four, oldest first
    let contents: Vec<String> = history.snapshot().into_iter().map(|t| t.content).collect();
    assert_eq!(contents, vec!["turn 96", "turn 97", "turn 98", "turn 99"]);
}

#[test]
fn clear_then_snapshot_is_empty() {
    let mut history = History::new(10);
    for i in 0..5 {
        history.append(Turn::user(format!("turn {i}"))).unwrap();
    }

    history.clear();
    assert!(history.snapshot().is_empty());

    // The store remains usable after clearing
    history.append(Turn::user("neu")).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn turns_keep_role_and_timestamp() {
    let before = chrono::Utc::now();
    let turn = Turn::user("Hallo");
    let after = chrono::Utc::now();

    assert_eq!(turn.role, Role::User);
    assert!(turn.timestamp >= before && turn.timestamp <= after);
    assert_eq!(Turn::agent("Hi").role, Role::Agent);
}

#[tokio::test]
async fn differently_keyed_sessions_never_share_turns() {
    let registry = SessionRegistry::new(10);

    {
        let alice = registry.session("alice").await;
        let mut history = alice.lock().await;
        history.append(Turn::user("Geheimnis von Alice")).unwrap();
        history.append(Turn::agent("Notiert.")).unwrap();
    }

    let bob = registry.session("bob").await;
    assert!(bob.lock().await.snapshot().is_empty());

    let alice = registry.session("alice").await;
    let turns = alice.lock().await.snapshot();
    assert_eq!(turns.len(), 2);
    assert!(turns.iter().all(|t| !t.content.contains("Bob")));
}

#[tokio::test]
async fn reset_affects_only_the_named_session() {
    let registry = SessionRegistry::new(10);

    for key in ["a", "b"] {
        let session = registry.session(key).await;
        let mut history = session.lock().await;
        for i in 0..5 {
            history.append(Turn::user(format!("{key} {i}"))).unwrap();
        }
    }

    registry.reset("a").await;

    assert!(registry.session("a").await.lock().await.snapshot().is_empty());
    assert_eq!(registry.session("b").await.lock().await.len(), 5);
}
