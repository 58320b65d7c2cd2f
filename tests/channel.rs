//! Channel layer behavior (message shaping, chunking, dedup)

use stimme_gateway::channels::telegram::chunking::chunk_text;
use stimme_gateway::channels::telegram::dedup::UpdateDedup;
use stimme_gateway::channels::OutgoingMessage;

#[test]
fn long_replies_split_under_telegram_cap() {
    // A long prose answer, well over the 4096-char cap
    let sentence = "Das ist ein ziemlich langer Satz über das Wetter in Linz. ";
    let text = sentence.repeat(120);
    assert!(text.chars().count() > 4096);

    let chunks = chunk_text(&text, 4000);
    assert!(chunks.len() >= 2);
    assert!(chunks.iter().all(|c| c.chars().count() <= 4000));
    assert!(chunks.iter().all(|c| !c.is_empty()));

    // Nothing is lost
    let total_words: usize = chunks.iter().map(|c| c.split_whitespace().count()).sum();
    assert_eq!(total_words, text.split_whitespace().count());
}

#[test]
fn short_replies_stay_whole() {
    let chunks = chunk_text("Kurz und gut.", 4000);
    assert_eq!(chunks, vec!["Kurz und gut."]);
}

#[test]
fn paragraphs_survive_chunking() {
    let text = format!("{}\n\n{}", "a".repeat(3000), "b".repeat(3000));
    let chunks = chunk_text(&text, 4000);
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].starts_with('a'));
    assert!(chunks[1].starts_with('b'));
}

#[test]
fn update_dedup_filters_repeats() {
    let mut dedup = UpdateDedup::default();

    assert!(!dedup.is_duplicate(1001));
    assert!(!dedup.is_duplicate(1002));
    assert!(dedup.is_duplicate(1001));
    assert!(dedup.is_duplicate(1002));
    assert!(!dedup.is_duplicate(1003));
}

#[test]
fn outgoing_message_defaults() {
    let msg = OutgoingMessage::text("42".to_string(), "Hallo!".to_string());
    assert_eq!(msg.channel_id, "42");
    assert!(msg.reply_to.is_none());
    assert!(!msg.markdown);

    let reply =
        OutgoingMessage::reply("42".to_string(), "Hallo!".to_string(), "17".to_string());
    assert_eq!(reply.reply_to.as_deref(), Some("17"));
}
