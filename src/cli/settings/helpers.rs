//! Helper functions for settings operations.

use crate::core::config::data::Config;
use crate::core::personality::Personality;
use crate::provider::ProviderKind;

use super::error::SettingError;

pub fn load_config() -> Result<Config, SettingError> {
    Config::load().map_err(|e| SettingError::ConfigError(e.to_string()))
}

pub fn save_config(config: &Config) -> Result<(), SettingError> {
    config
        .save()
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}

/// Resolve a provider name or alias to its canonical id.
pub fn validate_provider(input: &str) -> Result<String, SettingError> {
    ProviderKind::from_name(input)
        .map(|kind| kind.as_str().to_string())
        .ok_or_else(|| SettingError::UnknownProvider {
            input: input.to_string(),
        })
}

pub fn validate_personality(input: &str) -> Result<String, SettingError> {
    Personality::from_name(input)
        .map(|p| p.as_str().to_string())
        .ok_or_else(|| SettingError::UnknownPersonality {
            input: input.to_string(),
        })
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}

pub fn format_optional(key: &str, value: Option<&str>) -> String {
    format!("  {key}: {}", value.unwrap_or("(unset)"))
}
