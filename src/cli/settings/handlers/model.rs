//! Preferred model per provider.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_optional, success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::provider::ProviderKind;

/// Handler for `claude-model` and `openai-model`.
pub struct ModelHandler {
    provider: ProviderKind,
}

impl ModelHandler {
    pub fn new(provider: ProviderKind) -> Self {
        Self { provider }
    }

    fn slot<'a>(&self, config: &'a mut Config) -> &'a mut Option<String> {
        match self.provider {
            ProviderKind::Claude => &mut config.claude_model,
            ProviderKind::ChatGpt => &mut config.openai_model,
        }
    }
}

impl SettingHandler for ModelHandler {
    fn key(&self) -> &'static str {
        match self.provider {
            ProviderKind::Claude => "claude-model",
            ProviderKind::ChatGpt => "openai-model",
        }
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let model = args.join(" ");
        let model = model.trim();
        if model.is_empty() {
            return Err(match self.provider {
                ProviderKind::Claude => SettingError::MissingArgs {
                    hint: "To set the Claude model, specify the model id:",
                    example: "friendchat set claude-model claude-sonnet-4-20250514",
                },
                ProviderKind::ChatGpt => SettingError::MissingArgs {
                    hint: "To set the ChatGPT model, specify the model id:",
                    example: "friendchat set openai-model gpt-4o",
                },
            });
        }

        *self.slot(config) = Some(model.to_string());
        Ok(success_set(self.key(), model))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        *self.slot(config) = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        let value = match self.provider {
            ProviderKind::Claude => config.claude_model.as_deref(),
            ProviderKind::ChatGpt => config.openai_model.as_deref(),
        };
        format_optional(self.key(), value)
    }
}
