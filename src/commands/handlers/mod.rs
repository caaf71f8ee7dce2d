pub(super) mod friends;
pub(super) mod session;

use crate::commands::registry::{all_commands, HelpSection};

const RULE_WIDTH: usize = 60;

pub(super) fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub(super) fn help_text() -> String {
    let mut lines = Vec::new();
    for section in [HelpSection::Chat, HelpSection::Friends, HelpSection::Other] {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(section.title().to_string());
        for command in all_commands().iter().filter(|c| c.section == section) {
            let aliases: Vec<String> = command.names[1..].iter().map(|n| format!("/{n}")).collect();
            let aliases = if aliases.is_empty() {
                String::new()
            } else {
                format!(" (also {})", aliases.join(", "))
            };
            lines.push(format!("  {} - {}{aliases}", command.usage, command.description));
        }
    }
    lines.join("\n")
}
