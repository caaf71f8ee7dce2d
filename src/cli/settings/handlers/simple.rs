//! Simple setting handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{
    format_optional, success_set, success_unset, validate_personality, validate_provider,
};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;

/// Handler for the `default-provider` setting.
pub struct DefaultProviderHandler;

impl SettingHandler for DefaultProviderHandler {
    fn key(&self) -> &'static str {
        "default-provider"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a default provider, specify the provider:",
                example: "friendchat set default-provider claude",
            });
        }

        let provider = validate_provider(&args.join(" "))?;
        let message = success_set(self.key(), &provider);
        config.default_provider = Some(provider);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.default_provider = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format_optional(self.key(), config.default_provider.as_deref())
    }
}

/// Handler for the `default-personality` setting.
pub struct DefaultPersonalityHandler;

impl SettingHandler for DefaultPersonalityHandler {
    fn key(&self) -> &'static str {
        "default-personality"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a default personality, specify its name:",
                example: "friendchat set default-personality wise",
            });
        }

        let personality = validate_personality(&args.join(" "))?;
        let message = success_set(self.key(), &personality);
        config.default_personality = Some(personality);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.default_personality = None;
        Ok(success_unset(self.key()))
    }

    fn format(&self, config: &Config) -> String {
        format_optional(self.key(), config.default_personality.as_deref())
    }
}
