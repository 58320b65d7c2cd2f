//! Raw Telegram Bot API calls

use super::retry::{is_recoverable, parse_retry_after};
use super::types::{
    BotCommand, GetFileRequest, SendChatActionRequest, SendMessageRequest, SetMyCommandsRequest,
    TelegramFile, TelegramResponse, API_BASE, FILE_BASE,
};
use crate::{Error, Result};

impl super::TelegramChannel {
    /// Send a message to a chat, retrying recoverable API errors.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails after all retries
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        parse_mode: Option<String>,
    ) -> Result<()> {
        let url = format!("{API_BASE}{}/sendMessage", self.token);

        for attempt in 0..=self.retry.max_retries {
            let request = SendMessageRequest {
                chat_id,
                text: text.to_string(),
                parse_mode: parse_mode.clone(),
                reply_to_message_id: reply_to,
            };

            let response = match self.client.post(&url).json(&request).send().await {
                Ok(response) => response,
                Err(e) if attempt < self.retry.max_retries => {
                    tracing::warn!(chat_id, attempt, error = %e, "sendMessage transport error, retrying");
                    tokio::time::sleep(self.retry.delay(attempt, None)).await;
                    continue;
                }
                Err(e) => return Err(Error::Channel(format!("Telegram API error: {e}"))),
            };

            let status = response.status();
            if status.is_success() {
                tracing::debug!(chat_id, "Telegram message sent");
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();

            if is_recoverable(status.as_u16()) && attempt < self.retry.max_retries {
                let delay = self.retry.delay(attempt, parse_retry_after(&body));
                tracing::warn!(
                    chat_id,
                    attempt,
                    status = status.as_u16(),
                    delay_ms = delay.as_millis() as u64,
                    "sendMessage failed, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            // Markdown parse errors: retry once as plain text
            if parse_mode.is_some() && status.as_u16() == 400 {
                tracing::warn!(chat_id, "Markdown rejected, resending as plain text");

                let fallback = SendMessageRequest {
                    chat_id,
                    text: text.to_string(),
                    parse_mode: None,
                    reply_to_message_id: reply_to,
                };

                let fallback_response = self
                    .client
                    .post(&url)
                    .json(&fallback)
                    .send()
                    .await
                    .map_err(|e| Error::Channel(format!("Telegram API error: {e}")))?;

                if fallback_response.status().is_success() {
                    return Ok(());
                }

                let fallback_status = fallback_response.status();
                let fallback_body = fallback_response.text().await.unwrap_or_default();
                return Err(Error::Channel(format!(
                    "Telegram API error: {fallback_status} - {fallback_body}"
                )));
            }

            return Err(Error::Channel(format!(
                "Telegram API error: {status} - {body}"
            )));
        }

        Err(Error::Channel("Telegram API error: retries exhausted".to_string()))
    }

    /// Send a chat action (typing indicator, etc.)
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<()> {
        let url = format!("{API_BASE}{}/sendChatAction", self.token);

        let request = SendChatActionRequest {
            chat_id,
            action: action.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram sendChatAction error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "Telegram sendChatAction error: {status} - {body}"
            )));
        }

        Ok(())
    }

    /// Upload audio bytes as a voice message.
    ///
    /// Telegram renders the upload as a playable voice note.
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails
    pub async fn send_voice(
        &self,
        chat_id: i64,
        audio: Vec<u8>,
        filename: &str,
        reply_to: Option<i64>,
    ) -> Result<()> {
        let url = format!("{API_BASE}{}/sendVoice", self.token);

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str("audio/mpeg")
            .map_err(|e| Error::Channel(format!("Telegram sendVoice error: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("voice", part);
        if let Some(reply) = reply_to {
            form = form.text("reply_to_message_id", reply.to_string());
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram sendVoice error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "Telegram sendVoice error: {status} - {body}"
            )));
        }

        tracing::debug!(chat_id, "Telegram voice message sent");
        Ok(())
    }

    /// Download a file from Telegram by `file_id`.
    ///
    /// Calls `getFile` for the file path, then downloads from the file
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the API request or download fails
    pub async fn download_file(&self, file_id: &str) -> Result<(Vec<u8>, String)> {
        let url = format!("{API_BASE}{}/getFile", self.token);

        let request = GetFileRequest {
            file_id: file_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram getFile error: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Channel(format!("Telegram getFile response read error: {e}")))?;

        let parsed: TelegramResponse<TelegramFile> = serde_json::from_str(&body)
            .map_err(|e| Error::Channel(format!("Telegram getFile parse error: {e}")))?;

        let file = parsed.result.ok_or_else(|| {
            Error::Channel(format!(
                "Telegram getFile error: {}",
                parsed.description.unwrap_or_default()
            ))
        })?;

        let file_path = file
            .file_path
            .ok_or_else(|| Error::Channel("Telegram getFile returned no file_path".to_string()))?;

        let download_url = format!("{FILE_BASE}{}/{file_path}", self.token);
        let data = self
            .client
            .get(&download_url)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram file download error: {e}")))?
            .bytes()
            .await
            .map_err(|e| Error::Channel(format!("Telegram file download read error: {e}")))?;

        Ok((data.to_vec(), file_path))
    }

    /// Sync bot commands with Telegram via `setMyCommands`
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn sync_commands(&self, commands: &[BotCommand]) -> Result<()> {
        let url = format!("{API_BASE}{}/setMyCommands", self.token);

        let request = SetMyCommandsRequest {
            commands: commands.to_vec(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram setMyCommands error: {e}")))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "Telegram setMyCommands error: {body}"
            )));
        }

        tracing::info!(count = commands.len(), "Telegram bot commands synced");
        Ok(())
    }

    /// Validate the bot token by calling `getMe`
    ///
    /// # Errors
    ///
    /// Returns error if the token is invalid
    pub async fn get_me(&self) -> Result<()> {
        let url = format!("{API_BASE}{}/getMe", self.token);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram getMe error: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Channel("Invalid Telegram bot token".to_string()));
        }

        Ok(())
    }
}
