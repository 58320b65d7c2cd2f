//! Telegram channel adapter
//!
//! Uses long polling (getUpdates) for receiving messages and the Bot API
//! for sending.

mod api;
pub mod chunking;
pub mod dedup;
pub mod polling;
pub mod retry;
pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::mpsc;

use super::{Channel, IncomingMessage, OutgoingMessage};
use crate::{Error, Result};

pub use retry::RetryPolicy;
pub use types::BotCommand;

/// Telegram message size limit, with margin (hard cap is 4096)
const MESSAGE_CHUNK_LIMIT: usize = 4000;

/// Telegram channel adapter
#[derive(Clone)]
pub struct TelegramChannel {
    token: String,
    client: Client,
    message_tx: Option<mpsc::Sender<IncomingMessage>>,
    connected: bool,
    retry: RetryPolicy,
}

impl TelegramChannel {
    /// Create a new Telegram channel adapter
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: Client::new(),
            message_tx: None,
            connected: false,
            retry: RetryPolicy::default(),
        }
    }

    /// Create with a message receiver for polling mode
    ///
    /// Returns the channel and a receiver for incoming messages
    #[must_use]
    pub fn with_receiver(token: String) -> (Self, mpsc::Receiver<IncomingMessage>) {
        let (tx, rx) = mpsc::channel(100);
        let channel = Self {
            token,
            client: Client::new(),
            message_tx: Some(tx),
            connected: false,
            retry: RetryPolicy::default(),
        };
        (channel, rx)
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn connect(&mut self) -> Result<()> {
        self.get_me().await?;
        self.connected = true;
        tracing::info!("Telegram channel connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        tracing::info!("Telegram channel disconnected");
        Ok(())
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        let chat_id: i64 = message
            .channel_id
            .parse()
            .map_err(|_| Error::Channel("Invalid chat ID".to_string()))?;

        let mut reply_to: Option<i64> =
            message.reply_to.as_ref().and_then(|id| id.parse().ok());
        let parse_mode = message.markdown.then(|| "Markdown".to_string());

        // Long replies go out as multiple messages; only the first one
        // carries the reply reference
        let chunks = chunking::chunk_text(&message.content, MESSAGE_CHUNK_LIMIT);
        for chunk in chunks {
            self.send_message(chat_id, &chunk, reply_to.take(), parse_mode.clone())
                .await?;
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send_typing(&self, channel_id: &str) -> Result<()> {
        let chat_id: i64 = channel_id
            .parse()
            .map_err(|_| Error::Channel("Invalid chat ID".to_string()))?;

        self.send_chat_action(chat_id, "typing").await?;
        tracing::debug!(chat_id, "Telegram typing indicator sent");
        Ok(())
    }
}
