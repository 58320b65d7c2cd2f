//! Telegram bot front end
//!
//! Routes text and voice messages through the shared orchestration path and
//! answers the `/start`, `/help` and `/reset` commands. Updates are handled
//! sequentially, so a session's turns keep their arrival order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::channels::telegram::BotCommand;
use crate::channels::{Channel, IncomingMessage, OutgoingMessage, TelegramChannel};
use crate::pipeline::VoicePipeline;
use crate::Result;

/// Polling interval between getUpdates long polls
const POLL_INTERVAL: Duration = Duration::from_secs(1);

const GREETING: &str = "\
🎙️ *Voice Agent - Dein KI-Assistent*

Ich kann:
✅ Sprachnachrichten verstehen (einfach Voice Message senden!)
✅ Text-Nachrichten beantworten
✅ Im Web suchen 🔍
✅ Wikipedia konsultieren 📚
✅ Websites abrufen 🌐
✅ Rechnen 🧮
✅ Zeit & Datum abrufen 📅

*Befehle:*
/start - Diese Nachricht
/reset - Konversation zurücksetzen
/help - Hilfe

*Einfach losschreiben oder Voice Message senden! 🎤*";

const HELP: &str = "\
📚 *Hilfe*

*Voice Messages:*
- Einfach Voice Message senden 🎤
- Ich transkribiere und antworte mit Voice!

*Text Messages:*
- Normale Fragen stellen
- Ich antworte mit Text

*Beispiel-Anfragen:*
• \"Suche aktuelle Nachrichten über KI\"
• \"Was ist Python?\" (Wikipedia)
• \"Was ist 123 * 456?\"
• \"Wie spät ist es?\"
• \"Öffne https://example.com\"

*Befehle:*
/reset - Konversation neu starten
/help - Diese Hilfe";

const RESET_REPLY: &str = "🔄 Konversation zurückgesetzt!";

/// Telegram bot wrapping the voice pipeline
pub struct TelegramBot {
    channel: TelegramChannel,
    rx: mpsc::Receiver<IncomingMessage>,
    pipeline: Arc<VoicePipeline>,
}

/// A bot command parsed from message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Help,
    Reset,
    Unknown,
}

/// Parse a leading `/command`, tolerating a `@botname` suffix.
fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let word = text.split_whitespace().next().unwrap_or_default();
    let name = word
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or_default();

    Some(match name {
        "start" => Command::Start,
        "help" => Command::Help,
        "reset" => Command::Reset,
        _ => Command::Unknown,
    })
}

impl TelegramBot {
    /// Create a bot for the given token and pipeline
    #[must_use]
    pub fn new(token: String, pipeline: Arc<VoicePipeline>) -> Self {
        let (channel, rx) = TelegramChannel::with_receiver(token);
        Self {
            channel,
            rx,
            pipeline,
        }
    }

    /// Run the bot until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns error if the bot token is invalid or command registration
    /// fails.
    pub async fn run(mut self) -> Result<()> {
        self.channel.connect().await?;

        self.channel
            .sync_commands(&[
                BotCommand {
                    command: "start".to_string(),
                    description: "Begrüßung und Übersicht".to_string(),
                },
                BotCommand {
                    command: "help".to_string(),
                    description: "Hilfe anzeigen".to_string(),
                },
                BotCommand {
                    command: "reset".to_string(),
                    description: "Konversation zurücksetzen".to_string(),
                },
            ])
            .await?;

        let _polling = self.channel.start_polling(POLL_INTERVAL);
        tracing::info!("Telegram bot running");

        while let Some(message) = self.rx.recv().await {
            self.handle_message(message).await;
        }

        Ok(())
    }

    /// Handle one incoming message; errors become user-facing replies
    async fn handle_message(&self, message: IncomingMessage) {
        if let Some(command) = parse_command(&message.content) {
            self.handle_command(command, &message).await;
            return;
        }

        if message.voice.is_some() {
            self.handle_voice(&message).await;
        } else {
            self.handle_text(&message).await;
        }
    }

    async fn handle_command(&self, command: Command, message: &IncomingMessage) {
        tracing::debug!(
            sender = %message.sender_id,
            ?command,
            "handling command"
        );

        let reply = match command {
            Command::Start => GREETING,
            Command::Help => HELP,
            Command::Reset => {
                self.pipeline
                    .orchestrator()
                    .reset(&message.sender_id)
                    .await;
                RESET_REPLY
            }
            Command::Unknown => return,
        };

        let outgoing =
            OutgoingMessage::text(message.channel_id.clone(), reply.to_string()).with_markdown();
        if let Err(e) = self.channel.send(outgoing).await {
            tracing::warn!(error = %e, "failed to send command reply");
        }
    }

    async fn handle_text(&self, message: &IncomingMessage) {
        tracing::info!(sender = %message.sender_id, "text message received");

        if let Err(e) = self.channel.send_typing(&message.channel_id).await {
            tracing::debug!(error = %e, "typing indicator failed");
        }

        let reply = match self
            .pipeline
            .orchestrator()
            .converse(&message.sender_id, &message.content)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(sender = %message.sender_id, error = %e, "text turn failed");
                format!("❌ Fehler: {e}")
            }
        };

        let outgoing = OutgoingMessage::text(message.channel_id.clone(), reply);
        if let Err(e) = self.channel.send(outgoing).await {
            tracing::warn!(error = %e, "failed to send reply");
        }
    }

    async fn handle_voice(&self, message: &IncomingMessage) {
        tracing::info!(sender = %message.sender_id, "voice message received");

        if let Err(e) = self.channel.send_typing(&message.channel_id).await {
            tracing::debug!(error = %e, "typing indicator failed");
        }

        match self.process_voice(message).await {
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(sender = %message.sender_id, error = %e, "voice turn failed");
                let outgoing = OutgoingMessage::text(
                    message.channel_id.clone(),
                    format!("❌ Fehler bei Voice-Verarbeitung: {e}"),
                );
                if let Err(e) = self.channel.send(outgoing).await {
                    tracing::warn!(error = %e, "failed to send error reply");
                }
            }
        }
    }

    async fn process_voice(&self, message: &IncomingMessage) -> Result<()> {
        let voice = message
            .voice
            .as_ref()
            .expect("handle_voice called without voice");

        let (audio, file_path) = self.channel.download_file(&voice.file_id).await?;
        tracing::debug!(bytes = audio.len(), file = %file_path, "voice downloaded");

        let filename = file_path
            .rsplit('/')
            .next()
            .unwrap_or("voice.ogg")
            .to_string();

        let outcome = self
            .pipeline
            .process(&message.sender_id, &audio, &filename, true)
            .await?;

        let text_reply = format!(
            "🗣️ Du: {}\n\n💬 Ich: {}",
            outcome.transcription, outcome.response
        );
        self.channel
            .send(OutgoingMessage::text(message.channel_id.clone(), text_reply))
            .await?;

        if let Some(audio) = outcome.audio {
            let chat_id: i64 = message
                .channel_id
                .parse()
                .map_err(|_| crate::Error::Channel("Invalid chat ID".to_string()))?;
            self.channel
                .send_voice(chat_id, audio, "antwort.mp3", None)
                .await?;
        }

        Ok(())
    }
}
