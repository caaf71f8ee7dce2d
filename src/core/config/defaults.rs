//! Effective settings: configured values with built-in defaults filled in.

use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::personality::{MainPersonality, Personality};
use crate::provider::{anthropic, openai, ModelPlan, ProviderKind};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 5500;
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 30;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

impl Config {
    /// Configured default provider, if it names one we know.
    pub fn preferred_provider(&self) -> Option<ProviderKind> {
        self.default_provider
            .as_deref()
            .and_then(ProviderKind::from_name)
    }

    /// Starting personality for the main assistant. Unknown names fall back
    /// to the default template.
    pub fn main_personality(&self) -> MainPersonality {
        let personality = self
            .default_personality
            .as_deref()
            .and_then(Personality::from_name)
            .unwrap_or(Personality::Default);
        MainPersonality::Named(personality)
    }

    pub fn model_plan(&self, kind: ProviderKind) -> ModelPlan {
        match kind {
            ProviderKind::Claude => ModelPlan::new(
                non_blank(&self.claude_model).unwrap_or(anthropic::DEFAULT_MODEL),
                self.claude_fallback_models.clone().unwrap_or_else(|| {
                    anthropic::DEFAULT_FALLBACK_MODELS
                        .iter()
                        .map(|m| m.to_string())
                        .collect()
                }),
            ),
            ProviderKind::ChatGpt => ModelPlan::new(
                non_blank(&self.openai_model).unwrap_or(openai::DEFAULT_MODEL),
                self.openai_fallback_models.clone().unwrap_or_default(),
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn server_host(&self) -> &str {
        non_blank(&self.server_host).unwrap_or(DEFAULT_SERVER_HOST)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        let minutes = self
            .session_idle_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);
        Duration::from_secs(minutes.saturating_mul(60))
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_SESSIONS)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
