//! Settings management for CLI set/unset commands.
//!
//! Each persisted key has a handler that validates input and edits a
//! [`Config`] in memory; the caller loads and saves the file around it.
//!
//! - Simple settings (`default-provider`, `default-personality`)
//! - Provider model settings (`claude-model`, `openai-model`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Validate `args` and store the value. Returns the message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value. Returns the message to display.
    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;

    /// Format the current value for display in `friendchat set` output.
    fn format(&self, config: &Config) -> String;
}

/// `friendchat set <key> <value...>`; with no key, print every setting.
pub fn run_set(key: Option<&str>, args: &[String]) -> Result<(), SettingError> {
    let registry = SettingRegistry::new();
    let mut config = helpers::load_config()?;

    let Some(key) = key else {
        registry.print_all(&config);
        return Ok(());
    };

    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let message = handler.set(args, &mut config)?;
    helpers::save_config(&config)?;
    println!("{message}");
    Ok(())
}

/// `friendchat unset <key>`
pub fn run_unset(key: &str) -> Result<(), SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;

    let mut config = helpers::load_config()?;
    let message = handler.unset(&mut config)?;
    helpers::save_config(&config)?;
    println!("{message}");
    Ok(())
}
