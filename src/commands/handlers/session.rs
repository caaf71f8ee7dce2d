use super::rule;
use crate::core::chat::ChatSession;
use crate::core::message::Role;
use crate::core::personality::{MainPersonality, ALL_PERSONALITIES};
use crate::provider::ProviderKind;
use crate::utils::text::preview;

const HISTORY_PREVIEW_CHARS: usize = 100;
const PROMPT_PREVIEW_CHARS: usize = 100;
const USAGE_PREVIEW_CHARS: usize = 60;

pub(crate) fn select_provider(session: &mut ChatSession, kind: ProviderKind) -> String {
    if session.select_provider(kind) {
        format!("✓ Switched to {}", kind.display_name())
    } else {
        format!("❌ {} not available (check API key)", kind.display_name())
    }
}

pub(crate) fn personality_usage() -> String {
    let mut lines = vec![
        "Usage: /personality <name>".to_string(),
        "Available personalities:".to_string(),
    ];
    for personality in ALL_PERSONALITIES {
        lines.push(format!(
            "  - {}: {}",
            personality,
            preview(personality.system_prompt(), USAGE_PREVIEW_CHARS)
        ));
    }
    lines.push(String::new());
    lines.push("Or use: /personalities to see full list".to_string());
    lines.join("\n")
}

pub(crate) fn set_personality(session: &mut ChatSession, name: &str) -> String {
    match session.set_personality(name) {
        Ok(change) => {
            let mut lines = Vec::new();
            if let Some(friend) = change.left_persona {
                lines.push(format!("✓ Switched back to main AI chatbot (left {friend})"));
            }
            lines.push(format!("✓ Personality changed to: {}", change.label));
            lines.push(format!(
                "  {}",
                preview(session.controller().system_prompt(), PROMPT_PREVIEW_CHARS)
            ));
            lines.join("\n")
        }
        Err(err) => format!("❌ {err}"),
    }
}

pub(crate) fn set_custom(session: &mut ChatSession, prompt: &str) -> String {
    let change = session.set_custom_personality(prompt);
    let mut lines = Vec::new();
    if let Some(friend) = change.left_persona {
        lines.push(format!("✓ Switched back to main AI chatbot (left {friend})"));
    }
    lines.push("✓ Custom personality set!".to_string());
    lines.push(format!("  {}", preview(prompt, PROMPT_PREVIEW_CHARS)));
    lines.join("\n")
}

pub(crate) fn list_personalities(session: &ChatSession) -> String {
    let mut lines = vec!["🎭 Available Personalities:".to_string(), rule()];
    for personality in ALL_PERSONALITIES {
        let current = match session.personality() {
            MainPersonality::Named(p) if p == personality => " (current)",
            _ => "",
        };
        lines.push(format!(
            "{}{current}:",
            personality.as_str().to_uppercase()
        ));
        lines.push(format!("  {}", personality.system_prompt()));
    }
    if let MainPersonality::Custom(prompt) = session.personality() {
        lines.push("CUSTOM (current):".to_string());
        lines.push(format!("  {prompt}"));
    }
    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn clear(session: &mut ChatSession) -> String {
    session.clear_history();
    "Conversation history cleared!".to_string()
}

pub(crate) fn history(session: &ChatSession) -> String {
    let history = session.history();
    if history.is_empty() {
        return "No conversation history yet.".to_string();
    }

    let mut lines = vec!["📜 Conversation History:".to_string(), rule()];
    for (i, message) in history.iter().enumerate() {
        let speaker = match message.role {
            Role::User => "You",
            Role::Assistant => "AI",
        };
        lines.push(format!(
            "{}. {speaker}: {}",
            i + 1,
            preview(&message.content, HISTORY_PREVIEW_CHARS)
        ));
    }
    lines.push(rule());
    lines.join("\n")
}
