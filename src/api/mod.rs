//! Wire payloads for the two chat-completion APIs.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role.as_str(), message.content.clone())
    }
}

/// Anthropic Messages API request. The system prompt is a top-level field,
/// never a message.
#[derive(Serialize, Debug)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: &'a str,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
pub struct MessagesContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<MessagesContentBlock>,
}

impl MessagesResponse {
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.as_deref())
    }
}

/// OpenAI Chat Completions request. The system prompt travels as the first
/// message on every call.
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_response_skips_non_text_blocks() {
        let raw = r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"Hello!"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text(), Some("Hello!"));
    }

    #[test]
    fn chat_completion_response_reads_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Hi"}},{"message":{"content":"ignored"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_content(), Some("Hi"));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn messages_request_serializes_system_separately() {
        let request = MessagesRequest {
            model: "claude-test",
            max_tokens: 1024,
            system: "Be brief.",
            messages: vec![ChatMessage::from(&Message::user("hi"))],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["system"], "Be brief.");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }
}
