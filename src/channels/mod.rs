//! Messaging channel adapters
//!
//! Each channel implements the `Channel` trait to provide unified messaging.
//! Telegram is the only adapter currently shipped.

pub mod telegram;

use async_trait::async_trait;

pub use telegram::TelegramChannel;

use crate::Result;

/// Reference to a voice recording attached to an incoming message
#[derive(Debug, Clone)]
pub struct VoiceRef {
    /// Platform file identifier for download
    pub file_id: String,
    /// MIME type (best guess)
    pub mime_type: String,
    /// Recording duration in seconds, if reported
    pub duration_secs: Option<u32>,
}

/// A message from a channel
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Message identifier (platform-specific)
    pub id: String,

    /// Channel identifier (chat the message arrived in)
    pub channel_id: String,

    /// Sender identifier — used as the session key
    pub sender_id: String,

    /// Sender display name
    pub sender_name: String,

    /// Message text (empty for pure voice messages)
    pub content: String,

    /// Whether this is a direct message
    pub is_dm: bool,

    /// Attached voice recording, if any
    pub voice: Option<VoiceRef>,
}

/// A message to send to a channel
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// Channel identifier
    pub channel_id: String,

    /// Message content
    pub content: String,

    /// Optional reply-to message ID
    pub reply_to: Option<String>,

    /// Render content as Markdown (command replies)
    pub markdown: bool,
}

impl OutgoingMessage {
    /// Create a plain `text` message
    #[must_use]
    pub fn text(channel_id: String, content: String) -> Self {
        Self {
            channel_id,
            content,
            reply_to: None,
            markdown: false,
        }
    }

    /// Create a `reply` message
    #[must_use]
    pub fn reply(channel_id: String, content: String, reply_to: String) -> Self {
        Self {
            channel_id,
            content,
            reply_to: Some(reply_to),
            markdown: false,
        }
    }

    /// Mark the content as Markdown
    #[must_use]
    pub fn with_markdown(mut self) -> Self {
        self.markdown = true;
        self
    }
}

/// Trait for messaging channel adapters
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &'static str;

    /// Connect to the channel
    async fn connect(&mut self) -> Result<()>;

    /// Disconnect from the channel
    async fn disconnect(&mut self) -> Result<()>;

    /// Send a message
    async fn send(&self, message: OutgoingMessage) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send typing indicator to show the bot is processing
    ///
    /// Default implementation is a no-op for channels that don't support typing
    async fn send_typing(&self, _channel_id: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outgoing_message_builders() {
        let msg = OutgoingMessage::text("42".to_string(), "hallo".to_string());
        assert!(msg.reply_to.is_none());
        assert!(!msg.markdown);

        let reply = OutgoingMessage::reply("42".to_string(), "hallo".to_string(), "7".to_string())
            .with_markdown();
        assert_eq!(reply.reply_to.as_deref(), Some("7"));
        assert!(reply.markdown);
    }
}
