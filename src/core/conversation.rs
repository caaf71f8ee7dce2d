//! The single exchange routine every context goes through: pick a provider,
//! call it, and record the turn only if it succeeded.

use tracing::{debug, warn};

use crate::core::message::{History, Message};
use crate::provider::{ProviderErrorKind, ProviderKind, ProviderSet, Routing};

pub const NO_PROVIDER_TEXT: &str = "Error: No AI providers available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Answered,
    /// The provider answered with nothing but whitespace
    Empty,
    ProviderFailed(ProviderErrorKind),
    NoProvider,
}

/// Outcome of one exchange. Failures are carried as text so every transport
/// can render them; `status` says whether the text is a real answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub status: ReplyStatus,
    /// Provider that produced `text`, if one was called
    pub provider: Option<ProviderKind>,
    /// Availability fallback notice to show alongside the reply
    pub notice: Option<String>,
}

impl ChatReply {
    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Answered
    }

    fn no_provider() -> Self {
        Self {
            text: NO_PROVIDER_TEXT.to_string(),
            status: ReplyStatus::NoProvider,
            provider: None,
            notice: None,
        }
    }
}

/// Send `message` in the context described by `system_prompt` + `history`.
///
/// On success the user turn and then the assistant turn are appended to
/// `history`. On any failure, including a blank answer, `history` is left
/// exactly as it was. The history is only touched after the provider call
/// completes, so dropping this future part-way commits nothing.
pub async fn respond(
    providers: &ProviderSet,
    requested: ProviderKind,
    system_prompt: &str,
    history: &mut History,
    message: &str,
) -> ChatReply {
    let routing = providers.route(requested);
    let notice = routing.notice();
    let (kind, handle) = match routing {
        Routing::NoneAvailable => return ChatReply::no_provider(),
        Routing::Direct(kind) | Routing::Fallback { used: kind, .. } => {
            match providers.get(kind) {
                Some(handle) => (kind, handle),
                None => return ChatReply::no_provider(),
            }
        }
    };

    if let Some(notice) = &notice {
        warn!(requested = %requested, used = %kind, "{notice}");
    }

    match handle.send(history, system_prompt, message).await {
        Ok(reply) if reply.text.trim().is_empty() => {
            warn!(provider = %kind, model = %reply.model, "provider returned an empty reply");
            ChatReply {
                text: String::new(),
                status: ReplyStatus::Empty,
                provider: Some(kind),
                notice,
            }
        }
        Ok(reply) => {
            debug!(provider = %kind, model = %reply.model, "turn recorded");
            history.push(Message::user(message));
            history.push(Message::assistant(reply.text.clone()));
            ChatReply {
                text: reply.text,
                status: ReplyStatus::Answered,
                provider: Some(kind),
                notice,
            }
        }
        Err(err) => {
            warn!(provider = %kind, kind = err.kind.as_str(), error = %err, "provider call failed");
            ChatReply {
                text: format!("Error with {} API: {}", kind.display_name(), err),
                status: ReplyStatus::ProviderFailed(err.kind),
                provider: Some(kind),
                notice,
            }
        }
    }
}
