//! Groq reasoning engine (OpenAI-compatible chat completions with tools)
//!
//! Runs the provider's tool loop: when the model returns `tool_calls`, each
//! call is dispatched to the local [`ToolSet`] and the results are fed back
//! as `tool` messages until the model answers in plain text or the round
//! limit is reached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ConversationContext, ReasoningEngine};
use crate::tools::ToolSet;
use crate::{Error, Result};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Fallback reply when the model produces no text at all
const EMPTY_REPLY_FALLBACK: &str = "Entschuldigung, ich konnte keine Antwort generieren.";

/// Groq-backed reasoning engine
pub struct GroqEngine {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    max_tool_rounds: u32,
    tools: ToolSet,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [serde_json::Value]>,
}

/// A message in the OpenAI chat wire format
#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn text(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(call_id: String, content: String) -> Self {
        Self {
            role: "tool",
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id),
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    /// Raw JSON argument string
    arguments: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

impl GroqEngine {
    /// Create an engine from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be
    /// built.
    pub fn from_config(config: &crate::config::Config, tools: ToolSet) -> Result<Self> {
        if config.groq_api_key.is_empty() {
            return Err(Error::Config("Groq API key required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.groq_api_key.clone(),
            model: config.chat_model.clone(),
            base_url: GROQ_BASE_URL.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_tool_rounds: config.max_tool_rounds,
            tools,
        })
    }

    /// Issue one chat-completions request
    async fn complete(
        &self,
        messages: &[WireMessage],
        tools: &[serde_json::Value],
    ) -> Result<ResponseMessage> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: (!tools.is_empty()).then_some(tools),
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ReasoningUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Groq API error");
            return Err(Error::ReasoningUnavailable(format!(
                "Groq API error {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::ReasoningUnavailable(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| Error::ReasoningUnavailable("response had no choices".to_string()))
    }

    /// Convert the conversation context into wire messages
    fn build_messages(context: &ConversationContext) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(context.turns.len() + 1);

        if !context.system_prompt.is_empty() {
            messages.push(WireMessage::text("system", context.system_prompt.clone()));
        }

        for turn in &context.turns {
            messages.push(WireMessage::text(turn.role.as_str(), turn.content.clone()));
        }

        messages
    }
}

#[async_trait]
impl ReasoningEngine for GroqEngine {
    async fn generate(&self, context: &ConversationContext) -> Result<String> {
        let mut messages = Self::build_messages(context);
        let tools = self.tools.definitions();

        for round in 0..=self.max_tool_rounds {
            let reply = self.complete(&messages, &tools).await?;

            let Some(tool_calls) = reply.tool_calls.filter(|c| !c.is_empty()) else {
                let text = reply.content.unwrap_or_default();
                return Ok(if text.trim().is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    text
                });
            };

            if round == self.max_tool_rounds {
                tracing::warn!(
                    rounds = self.max_tool_rounds,
                    "tool round limit reached, answering without further calls"
                );
                return Ok(reply
                    .content
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()));
            }

            // Echo the assistant message (with its tool calls) back first
            messages.push(WireMessage {
                role: "assistant",
                content: reply.content,
                tool_calls: Some(tool_calls.clone()),
                tool_call_id: None,
            });

            for call in tool_calls {
                let output = self
                    .tools
                    .dispatch(&call.function.name, &call.function.arguments)
                    .await;
                tracing::debug!(
                    tool = %call.function.name,
                    output_chars = output.len(),
                    "tool call finished"
                );
                messages.push(WireMessage::tool_result(call.id, output));
            }
        }

        // Unreachable: the loop always returns on its final round
        Err(Error::ReasoningUnavailable(
            "tool loop ended without a reply".to_string(),
        ))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
