//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{
    DefaultPersonalityHandler, DefaultProviderHandler, ModelHandler,
};
use super::SettingHandler;
use crate::core::config::data::Config;
use crate::provider::ProviderKind;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `friendchat set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(DefaultProviderHandler));
        registry.register(Box::new(DefaultPersonalityHandler));
        registry.register(Box::new(ModelHandler::new(ProviderKind::Claude)));
        registry.register(Box::new(ModelHandler::new(ProviderKind::ChatGpt)));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    pub fn format_all(&self, config: &Config) -> Vec<String> {
        self.display_order
            .iter()
            .filter_map(|key| self.get(key))
            .map(|handler| handler.format(config))
            .collect()
    }

    pub fn print_all(&self, config: &Config) {
        println!("Current configuration:");
        for line in self.format_all(config) {
            println!("{line}");
        }
        if !config.friends.is_empty() {
            let names: Vec<&str> = config.friends.iter().map(|f| f.name.as_str()).collect();
            println!("  friends: {}", names.join(", "));
        }
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
