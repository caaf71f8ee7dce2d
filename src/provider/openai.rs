//! OpenAI Chat Completions adapter.

use async_trait::async_trait;
use tracing::debug;

use super::{ChatProvider, ProviderError, ProviderErrorKind, MAX_TOKENS};
use crate::api::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::core::message::Message;
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// The system prompt leads every request so the personality holds on
    /// each turn.
    fn build_messages(
        history: &[Message],
        system_prompt: &str,
        user_message: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::new("system", system_prompt));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::new("user", user_message));
        messages
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        user_message: &str,
        model: &str,
    ) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model,
            messages: Self::build_messages(history, system_prompt, user_message),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!(model, turns = request.messages.len(), "ChatGPT API request");

        let response = self
            .http
            .post(construct_api_url(&self.base_url, "chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_failure(status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Unknown, format!("Invalid response: {e}"))
        })?;

        parsed.first_content().map(str::to_string).ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Unknown, "Response contained no message")
        })
    }
}
