//! Anthropic Messages API adapter.

use async_trait::async_trait;
use tracing::debug;

use super::{ChatProvider, ProviderError, ProviderErrorKind, MAX_TOKENS};
use crate::api::{ChatMessage, MessagesRequest, MessagesResponse};
use crate::core::message::Message;
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "claude-3-5-sonnet-20241022",
    "claude-sonnet-4-20250514",
    "claude-3-5-sonnet-20240620",
];

pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn build_messages(history: &[Message], user_message: &str) -> Vec<ChatMessage> {
        history
            .iter()
            .map(ChatMessage::from)
            .chain(std::iter::once(ChatMessage::new("user", user_message)))
            .collect()
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        user_message: &str,
        model: &str,
    ) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            system: system_prompt,
            messages: Self::build_messages(history, user_message),
        };

        debug!(model, turns = request.messages.len(), "Claude API request");

        let response = self
            .http
            .post(construct_api_url(&self.base_url, "messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_failure(status.as_u16(), &body));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Unknown, format!("Invalid response: {e}"))
        })?;

        parsed.first_text().map(str::to_string).ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Unknown, "Response contained no text")
        })
    }
}
