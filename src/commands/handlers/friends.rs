use super::rule;
use crate::core::chat::{ChatSession, FriendPrompt, RemoveOutcome};
use crate::core::persona::AddOutcome;
use crate::core::session::BackOutcome;

pub(crate) fn add(session: &mut ChatSession, name: &str, prompt: FriendPrompt) -> String {
    let label = prompt.label().to_string();
    match session.add_friend(name, prompt) {
        AddOutcome::Added => format!("✓ Friend '{name}' added with {label} personality!"),
        AddOutcome::Replaced => format!(
            "✓ Friend '{name}' replaced with {label} personality (their conversation starts over)"
        ),
    }
}

pub(crate) fn list(session: &ChatSession) -> String {
    let friends = session.friends();
    if friends.is_empty() {
        return "No friends added yet. Use /addfriend <name> to add one!".to_string();
    }

    let mut lines = vec!["👥 Your Friends:".to_string(), rule()];
    for friend in friends {
        let active = if session.active_friend() == Some(friend.name.as_str()) {
            " (active)"
        } else {
            ""
        };
        lines.push(format!(
            "  • {}{active}: {} personality",
            friend.name, friend.personality
        ));
    }
    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn befriend(session: &mut ChatSession, name: &str) -> String {
    match session.switch_to_friend(name) {
        Ok(()) => format!("✓ Switched to {name}'s perspective"),
        Err(err) => format!("❌ {err}"),
    }
}

pub(crate) fn back(session: &mut ChatSession) -> String {
    match session.back_to_main() {
        BackOutcome::Switched { .. } => "✓ Switched back to main AI chatbot".to_string(),
        BackOutcome::AlreadyMain => "You're already using the main AI chatbot.".to_string(),
    }
}

pub(crate) fn remove(session: &mut ChatSession, name: &str) -> String {
    match session.remove_friend(name) {
        RemoveOutcome::NotFound => format!("❌ Friend '{name}' not found."),
        RemoveOutcome::Removed {
            was_active,
            group_ended,
            ..
        } => {
            let mut lines = vec![format!("✓ Friend '{name}' removed.")];
            if was_active {
                lines.push("✓ Switched back to main AI chatbot".to_string());
            }
            if group_ended {
                lines.push("✓ Group chat ended (no friends left in it)".to_string());
            }
            lines.join("\n")
        }
    }
}

pub(crate) fn start_group(session: &mut ChatSession, names: &[String]) -> String {
    match session.start_group_chat(names) {
        Ok(members) => format!(
            "✓ Group chat started with: {}\nFriends will take turns responding. Type /endgroupchat to stop.",
            members.join(", ")
        ),
        Err(_) => "❌ No valid friends found. Add friends first with /addfriend".to_string(),
    }
}

pub(crate) fn end_group(session: &mut ChatSession) -> String {
    session.end_group_chat();
    "✓ Group chat ended".to_string()
}
