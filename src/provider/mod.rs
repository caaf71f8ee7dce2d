//! Provider adapters: one external chat-completion call per `send`, plus the
//! model fallback policy layered on top.

pub mod anthropic;
pub mod error;
pub mod fallback;
pub mod openai;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::message::Message;

pub use anthropic::AnthropicProvider;
pub use error::{ProviderError, ProviderErrorKind};
pub use fallback::{send_with_fallback, ModelPlan, ModelReply};
pub use openai::OpenAiProvider;

/// Upper bound on reply length requested from either API.
pub const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Claude,
    ChatGpt,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude",
            ProviderKind::ChatGpt => "chatgpt",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Claude => "Claude",
            ProviderKind::ChatGpt => "ChatGPT",
        }
    }

    pub fn other(self) -> Self {
        match self {
            ProviderKind::Claude => ProviderKind::ChatGpt,
            ProviderKind::ChatGpt => ProviderKind::Claude,
        }
    }

    /// Accepts the short names used on the command line and in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Some(ProviderKind::Claude),
            "chatgpt" | "gpt" | "openai" => Some(ProviderKind::ChatGpt),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `history` followed by `user_message` under `system_prompt`, and
    /// return the assistant's text.
    async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        user_message: &str,
        model: &str,
    ) -> Result<String, ProviderError>;
}

/// A configured provider together with the models to try on it.
#[derive(Clone)]
pub struct ProviderHandle {
    pub provider: Arc<dyn ChatProvider>,
    pub models: ModelPlan,
}

impl ProviderHandle {
    pub fn new(provider: Arc<dyn ChatProvider>, models: ModelPlan) -> Self {
        Self { provider, models }
    }

    pub async fn send(
        &self,
        history: &[Message],
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ModelReply, ProviderError> {
        send_with_fallback(
            self.provider.as_ref(),
            &self.models,
            history,
            system_prompt,
            user_message,
        )
        .await
    }
}

/// Which provider actually answers a request, after availability fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    Direct(ProviderKind),
    /// The requested provider is not configured; the other one stands in.
    Fallback {
        requested: ProviderKind,
        used: ProviderKind,
    },
    NoneAvailable,
}

impl Routing {
    pub fn provider(self) -> Option<ProviderKind> {
        match self {
            Routing::Direct(kind) => Some(kind),
            Routing::Fallback { used, .. } => Some(used),
            Routing::NoneAvailable => None,
        }
    }

    pub fn notice(self) -> Option<String> {
        match self {
            Routing::Fallback { requested, used } => Some(format!(
                "⚠ {} not available, using {} instead...",
                requested.display_name(),
                used.display_name()
            )),
            _ => None,
        }
    }
}

/// The providers this process has credentials for. Cheap to clone.
#[derive(Clone, Default)]
pub struct ProviderSet {
    claude: Option<ProviderHandle>,
    chatgpt: Option<ProviderHandle>,
}

impl ProviderSet {
    pub fn new(claude: Option<ProviderHandle>, chatgpt: Option<ProviderHandle>) -> Self {
        Self { claude, chatgpt }
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderHandle> {
        match kind {
            ProviderKind::Claude => self.claude.as_ref(),
            ProviderKind::ChatGpt => self.chatgpt.as_ref(),
        }
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.claude.is_none() && self.chatgpt.is_none()
    }

    pub fn configured(&self) -> Vec<ProviderKind> {
        [ProviderKind::Claude, ProviderKind::ChatGpt]
            .into_iter()
            .filter(|kind| self.is_configured(*kind))
            .collect()
    }

    pub fn route(&self, requested: ProviderKind) -> Routing {
        if self.is_configured(requested) {
            Routing::Direct(requested)
        } else if self.is_configured(requested.other()) {
            Routing::Fallback {
                requested,
                used: requested.other(),
            }
        } else {
            Routing::NoneAvailable
        }
    }
}
