/// Where a command is listed in `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpSection {
    Chat,
    Friends,
    Other,
}

impl HelpSection {
    pub fn title(self) -> &'static str {
        match self {
            HelpSection::Chat => "Available commands:",
            HelpSection::Friends => "👥 Friend Conversation Commands:",
            HelpSection::Other => "Other commands:",
        }
    }
}

/// Identity of a registry entry; parsing matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    Claude,
    ChatGpt,
    Personality,
    Personalities,
    Custom,
    AddFriend,
    Friends,
    Befriend,
    Back,
    RemoveFriend,
    GroupChat,
    EndGroupChat,
    Clear,
    History,
    Help,
    Quit,
}

pub struct CommandSpec {
    pub id: CommandId,
    /// Primary name first, then aliases
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub section: HelpSection,
}

pub fn all_commands() -> &'static [CommandSpec] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    all_commands()
        .iter()
        .find(|command| command.names.iter().any(|n| n.eq_ignore_ascii_case(name)))
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        id: CommandId::Claude,
        names: &["claude"],
        usage: "/claude",
        description: "Switch to Claude",
        section: HelpSection::Chat,
    },
    CommandSpec {
        id: CommandId::ChatGpt,
        names: &["chatgpt", "gpt"],
        usage: "/chatgpt",
        description: "Switch to ChatGPT",
        section: HelpSection::Chat,
    },
    CommandSpec {
        id: CommandId::Personality,
        names: &["personality"],
        usage: "/personality <name>",
        description: "Change personality (clears the conversation)",
        section: HelpSection::Chat,
    },
    CommandSpec {
        id: CommandId::Personalities,
        names: &["personalities"],
        usage: "/personalities",
        description: "List available personalities",
        section: HelpSection::Chat,
    },
    CommandSpec {
        id: CommandId::Custom,
        names: &["custom"],
        usage: "/custom <prompt>",
        description: "Use your own personality prompt",
        section: HelpSection::Chat,
    },
    CommandSpec {
        id: CommandId::AddFriend,
        names: &["addfriend"],
        usage: "/addfriend <name> [personality | custom <prompt>]",
        description: "Add a friend persona",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::Friends,
        names: &["friends"],
        usage: "/friends",
        description: "List all friends",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::Befriend,
        names: &["befriend"],
        usage: "/befriend <name>",
        description: "Talk as a friend",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::Back,
        names: &["back"],
        usage: "/back",
        description: "Switch back to main AI",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::RemoveFriend,
        names: &["removefriend"],
        usage: "/removefriend <name>",
        description: "Remove a friend",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::GroupChat,
        names: &["groupchat"],
        usage: "/groupchat <name1> <name2> ...",
        description: "Start group chat",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::EndGroupChat,
        names: &["endgroupchat"],
        usage: "/endgroupchat",
        description: "End group chat mode",
        section: HelpSection::Friends,
    },
    CommandSpec {
        id: CommandId::Clear,
        names: &["clear"],
        usage: "/clear",
        description: "Clear conversation history",
        section: HelpSection::Other,
    },
    CommandSpec {
        id: CommandId::History,
        names: &["history"],
        usage: "/history",
        description: "Show conversation history",
        section: HelpSection::Other,
    },
    CommandSpec {
        id: CommandId::Help,
        names: &["help"],
        usage: "/help",
        description: "Show this help message",
        section: HelpSection::Other,
    },
    CommandSpec {
        id: CommandId::Quit,
        names: &["quit", "exit"],
        usage: "/quit",
        description: "Exit the chatbot",
        section: HelpSection::Other,
    },
];
