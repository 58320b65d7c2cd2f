//! Telegram polling mode — getUpdates loop and message conversion

use serde::Deserialize;
use tokio::sync::mpsc;

use super::dedup::UpdateDedup;
use super::types::API_BASE;
use crate::channels::{IncomingMessage, VoiceRef};

/// Long-poll timeout passed to getUpdates, in seconds
const LONG_POLL_TIMEOUT_SECS: u32 = 30;

/// Response from Telegram getUpdates API
#[derive(Debug, Deserialize)]
struct GetUpdatesResponse {
    #[allow(dead_code)]
    ok: bool,
    result: Vec<PollingUpdate>,
}

/// A single update from getUpdates
#[derive(Debug, Deserialize)]
struct PollingUpdate {
    update_id: i64,
    message: Option<PollingMessage>,
}

/// Message from a polling update
#[derive(Debug, Deserialize)]
struct PollingMessage {
    message_id: i64,
    chat: PollingChat,
    from: Option<PollingUser>,
    text: Option<String>,
    voice: Option<PollingVoice>,
}

/// Voice note metadata from polling
#[derive(Debug, Deserialize)]
struct PollingVoice {
    file_id: String,
    mime_type: Option<String>,
    duration: Option<u32>,
}

/// Chat info from polling
#[derive(Debug, Deserialize)]
struct PollingChat {
    id: i64,
    #[serde(rename = "type")]
    chat_type: String,
}

/// User info from polling
#[derive(Debug, Deserialize)]
struct PollingUser {
    id: i64,
    is_bot: bool,
    first_name: String,
}

impl super::TelegramChannel {
    /// Spawn a background task that polls Telegram's getUpdates API.
    ///
    /// Forwards received messages into the mpsc channel handed out by
    /// [`super::TelegramChannel::with_receiver`]. Deletes any existing
    /// webhook before starting so getUpdates works.
    ///
    /// # Panics
    ///
    /// Panics if the channel was created without a receiver.
    pub fn start_polling(&self, interval: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let token = self.token.clone();
        let client = self.client.clone();
        let tx = self
            .message_tx
            .clone()
            .expect("start_polling requires a message_tx (use with_receiver)");

        tokio::spawn(async move {
            polling_loop(token, client, tx, interval).await;
        })
    }
}

/// Run the polling loop (background task)
async fn polling_loop(
    token: String,
    client: reqwest::Client,
    tx: mpsc::Sender<IncomingMessage>,
    interval: std::time::Duration,
) {
    // Delete any existing webhook so getUpdates works
    let delete_url = format!("{API_BASE}{token}/deleteWebhook");
    if let Err(e) = client.post(&delete_url).send().await {
        tracing::warn!(error = %e, "failed to delete Telegram webhook before polling");
    }

    let mut offset: Option<i64> = None;
    let mut dedup = UpdateDedup::default();

    loop {
        let url = format!("{API_BASE}{token}/getUpdates");
        let mut params = serde_json::json!({
            "timeout": LONG_POLL_TIMEOUT_SECS,
            "allowed_updates": ["message"],
        });
        if let Some(off) = offset {
            params["offset"] = serde_json::json!(off);
        }

        match client.post(&url).json(&params).send().await {
            Ok(resp) => {
                if let Ok(body) = resp.text().await {
                    if let Ok(updates) = serde_json::from_str::<GetUpdatesResponse>(&body) {
                        for update in updates.result {
                            offset = Some(update.update_id + 1);

                            if dedup.is_duplicate(update.update_id) {
                                continue;
                            }

                            if let Some(msg) = update_to_incoming(update) {
                                if let Err(e) = tx.send(msg).await {
                                    tracing::warn!(error = %e, "failed to forward Telegram message");
                                }
                            }
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Telegram getUpdates error");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// Convert a polling update into an `IncomingMessage`
fn update_to_incoming(update: PollingUpdate) -> Option<IncomingMessage> {
    let msg = update.message?;

    // Skip bot messages
    if msg.from.as_ref().is_some_and(|u| u.is_bot) {
        return None;
    }

    let voice = msg.voice.map(|v| VoiceRef {
        file_id: v.file_id,
        mime_type: v.mime_type.unwrap_or_else(|| "audio/ogg".to_string()),
        duration_secs: v.duration,
    });

    let content = msg.text.unwrap_or_default();

    // Skip messages with neither text nor voice
    if content.is_empty() && voice.is_none() {
        return None;
    }

    let sender_id = msg
        .from
        .as_ref()
        .map_or_else(|| msg.chat.id.to_string(), |u| u.id.to_string());

    let sender_name = msg
        .from
        .as_ref()
        .map_or_else(|| "Unknown".to_string(), |u| u.first_name.clone());

    Some(IncomingMessage {
        id: msg.message_id.to_string(),
        channel_id: msg.chat.id.to_string(),
        sender_id,
        sender_name,
        content,
        is_dm: msg.chat.chat_type == "private",
        voice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_from_json(raw: &str) -> PollingUpdate {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn text_update_converts() {
        let update = update_from_json(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 5,
                    "chat": {"id": 99, "type": "private"},
                    "from": {"id": 7, "is_bot": false, "first_name": "Dinel"},
                    "text": "Hallo"
                }
            }"#,
        );

        let msg = update_to_incoming(update).unwrap();
        assert_eq!(msg.content, "Hallo");
        assert_eq!(msg.sender_id, "7");
        assert_eq!(msg.channel_id, "99");
        assert!(msg.is_dm);
        assert!(msg.voice.is_none());
    }

    #[test]
    fn voice_update_converts() {
        let update = update_from_json(
            r#"{
                "update_id": 11,
                "message": {
                    "message_id": 6,
                    "chat": {"id": 99, "type": "private"},
                    "from": {"id": 7, "is_bot": false, "first_name": "Dinel"},
                    "voice": {"file_id": "abc123", "mime_type": "audio/ogg", "duration": 4}
                }
            }"#,
        );

        let msg = update_to_incoming(update).unwrap();
        assert!(msg.content.is_empty());
        let voice = msg.voice.unwrap();
        assert_eq!(voice.file_id, "abc123");
        assert_eq!(voice.duration_secs, Some(4));
    }

    #[test]
    fn bot_messages_are_skipped() {
        let update = update_from_json(
            r#"{
                "update_id": 12,
                "message": {
                    "message_id": 7,
                    "chat": {"id": 99, "type": "private"},
                    "from": {"id": 8, "is_bot": true, "first_name": "OtherBot"},
                    "text": "beep"
                }
            }"#,
        );

        assert!(update_to_incoming(update).is_none());
    }

    #[test]
    fn empty_updates_are_skipped() {
        let update = update_from_json(
            r#"{
                "update_id": 13,
                "message": {
                    "message_id": 8,
                    "chat": {"id": 99, "type": "group"}
                }
            }"#,
        );

        assert!(update_to_incoming(update).is_none());
    }
}
