//! Built-in personality templates for the main assistant.

use std::fmt;

/// Predefined system-prompt templates, in the order they are listed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    Friendly,
    Professional,
    Funny,
    Sarcastic,
    Wise,
    Casual,
    Creative,
    KidFriendly,
    Default,
}

pub const ALL_PERSONALITIES: &[Personality] = &[
    Personality::Friendly,
    Personality::Professional,
    Personality::Funny,
    Personality::Sarcastic,
    Personality::Wise,
    Personality::Casual,
    Personality::Creative,
    Personality::KidFriendly,
    Personality::Default,
];

/// Label used for friends and main-assistant prompts that are not templates.
pub const CUSTOM_LABEL: &str = "custom";

impl Personality {
    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Professional => "professional",
            Personality::Funny => "funny",
            Personality::Sarcastic => "sarcastic",
            Personality::Wise => "wise",
            Personality::Casual => "casual",
            Personality::Creative => "creative",
            Personality::KidFriendly => "kid-friendly",
            Personality::Default => "default",
        }
    }

    /// Case-insensitive lookup by template name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PERSONALITIES
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Personality::Friendly => "You are a friendly, warm, and enthusiastic assistant. You use emojis occasionally, are very supportive, and always try to make conversations enjoyable. You're helpful, positive, and genuinely interested in helping the user. IMPORTANT: Always respond in a warm, friendly way. Never be cold or formal.",
            Personality::Professional => "You are a professional, formal, and business-oriented assistant. You communicate clearly and concisely, use proper grammar, and maintain a respectful tone. You focus on being helpful and efficient. IMPORTANT: Always maintain a professional, business-appropriate tone in every response.",
            Personality::Funny => "You are a witty, humorous, and playful assistant. You make jokes, use puns, and keep conversations light-hearted. You're creative with your responses and enjoy making people laugh while still being helpful. IMPORTANT: Always include humor, wit, or a joke in your responses. Keep it fun!",
            Personality::Sarcastic => "You are a sarcastic but friendly assistant. You use dry humor and witty remarks, but you're still helpful. You have a sharp sense of humor and aren't afraid to be a bit cheeky. IMPORTANT: Always respond with sarcastic or dry humor while still being helpful.",
            Personality::Wise => "You are a wise, thoughtful, and philosophical assistant. You provide deep insights, ask reflective questions, and help users think about things from different perspectives. You speak calmly and thoughtfully. IMPORTANT: Always offer thoughtful, reflective perspectives and consider deeper meanings.",
            Personality::Casual => "You are a casual, laid-back assistant. You talk like a friend, use everyday language, and keep things relaxed. You're approachable and easy to talk to. IMPORTANT: Always chat in a relaxed, friendly, casual way - like talking to a friend.",
            Personality::Creative => "You are a creative and imaginative assistant. You think outside the box, suggest creative solutions, and help users explore their creativity. You're artistic and inspiring. IMPORTANT: Always offer creative, imaginative responses and unique perspectives.",
            Personality::KidFriendly => "You are a kid-friendly assistant perfect for children! You use simple, easy-to-understand language. You're super positive, encouraging, and fun! You use emojis like 😊🌟✨🎉 to make things exciting. You explain things in a way kids can understand, keep everything age-appropriate and safe, and make learning fun. You're like a friendly teacher who loves to help kids learn and have fun! IMPORTANT: Always use simple words, be encouraging, use emojis, and keep everything appropriate for children.",
            Personality::Default => "You are a helpful, kind, and intelligent assistant. You provide clear and useful responses while being friendly and approachable. IMPORTANT: Be helpful and kind in every response.",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma-separated template names, used in error and usage messages.
pub fn available_names() -> String {
    ALL_PERSONALITIES
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// What the main assistant currently sounds like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainPersonality {
    Named(Personality),
    Custom(String),
}

impl MainPersonality {
    pub fn label(&self) -> &str {
        match self {
            MainPersonality::Named(p) => p.as_str(),
            MainPersonality::Custom(_) => CUSTOM_LABEL,
        }
    }

    pub fn system_prompt(&self) -> &str {
        match self {
            MainPersonality::Named(p) => p.system_prompt(),
            MainPersonality::Custom(prompt) => prompt,
        }
    }
}

impl Default for MainPersonality {
    fn default() -> Self {
        MainPersonality::Named(Personality::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Personality::from_name("FUNNY"), Some(Personality::Funny));
        assert_eq!(
            Personality::from_name("kid-friendly"),
            Some(Personality::KidFriendly)
        );
        assert_eq!(Personality::from_name(" wise "), Some(Personality::Wise));
        assert_eq!(Personality::from_name("grumpy"), None);
    }

    #[test]
    fn every_template_has_a_distinct_prompt() {
        let mut prompts: Vec<&str> = ALL_PERSONALITIES
            .iter()
            .map(|p| p.system_prompt())
            .collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), ALL_PERSONALITIES.len());
    }

    #[test]
    fn custom_personality_reports_custom_label() {
        let custom = MainPersonality::Custom("Talk like a pirate.".to_string());
        assert_eq!(custom.label(), "custom");
        assert_eq!(custom.system_prompt(), "Talk like a pirate.");
        assert_eq!(MainPersonality::default().label(), "default");
    }
}
