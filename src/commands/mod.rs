mod handlers;
mod registry;

pub use registry::{all_commands, find_command, CommandId, CommandSpec, HelpSection};

use crate::core::chat::{ChatSession, FriendPrompt};
use crate::provider::ProviderKind;

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Blank,
    Message(String),
    Command(Command),
}

/// Every slash command the chat loop understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectProvider(ProviderKind),
    /// `None` lists the templates instead of changing anything
    Personality(Option<String>),
    Personalities,
    Custom(String),
    AddFriend { name: String, prompt: FriendPrompt },
    Friends,
    Befriend(String),
    Back,
    RemoveFriend(String),
    GroupChat(Vec<String>),
    EndGroupChat,
    Clear,
    History,
    Help,
    Quit,
    /// A known command missing a required argument
    Usage(&'static str),
    Unknown(String),
}

pub enum CommandResult {
    /// Text to show the user
    Reply(String),
    Quit,
}

const ADDFRIEND_USAGE: &str = "Usage: /addfriend <name> [personality | custom <prompt>]\nExample: /addfriend Alex funny";
const BEFRIEND_USAGE: &str = "Usage: /befriend <name>\nExample: /befriend Alex";
const REMOVEFRIEND_USAGE: &str = "Usage: /removefriend <name>";
const GROUPCHAT_USAGE: &str = "Usage: /groupchat <friend1> <friend2> ...\nExample: /groupchat Alex Sam";
const CUSTOM_USAGE: &str = "Usage: /custom <prompt>\nExample: /custom You are a pirate who loves puns.";

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Input::Message(trimmed.to_string());
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };
    if name.is_empty() {
        return Input::Message(trimmed.to_string());
    }

    Input::Command(parse_command(name, args))
}

/// Command names match case-insensitively; arguments keep their case.
pub fn parse_command(name: &str, args: &str) -> Command {
    let Some(spec) = registry::find_command(name) else {
        return Command::Unknown(name.to_string());
    };

    let first_arg = args.split_whitespace().next();
    match spec.id {
        CommandId::Claude => Command::SelectProvider(ProviderKind::Claude),
        CommandId::ChatGpt => Command::SelectProvider(ProviderKind::ChatGpt),
        CommandId::Personality => Command::Personality(first_arg.map(str::to_string)),
        CommandId::Personalities => Command::Personalities,
        CommandId::Custom if args.is_empty() => Command::Usage(CUSTOM_USAGE),
        CommandId::Custom => Command::Custom(args.to_string()),
        CommandId::AddFriend => parse_addfriend(args),
        CommandId::Friends => Command::Friends,
        CommandId::Befriend => first_arg
            .map(|name| Command::Befriend(name.to_string()))
            .unwrap_or(Command::Usage(BEFRIEND_USAGE)),
        CommandId::Back => Command::Back,
        CommandId::RemoveFriend => first_arg
            .map(|name| Command::RemoveFriend(name.to_string()))
            .unwrap_or(Command::Usage(REMOVEFRIEND_USAGE)),
        CommandId::GroupChat if args.is_empty() => Command::Usage(GROUPCHAT_USAGE),
        CommandId::GroupChat => {
            Command::GroupChat(args.split_whitespace().map(str::to_string).collect())
        }
        CommandId::EndGroupChat => Command::EndGroupChat,
        CommandId::Clear => Command::Clear,
        CommandId::History => Command::History,
        CommandId::Help => Command::Help,
        CommandId::Quit => Command::Quit,
    }
}

/// `<name> [personality | custom <prompt>]`
fn parse_addfriend(args: &str) -> Command {
    let (name, rest) = match args.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (args, ""),
    };
    if name.is_empty() {
        return Command::Usage(ADDFRIEND_USAGE);
    }

    let (kind, prompt) = match rest.split_once(char::is_whitespace) {
        Some((kind, prompt)) => (kind, prompt.trim()),
        None => (rest, ""),
    };

    let prompt = if kind.eq_ignore_ascii_case(crate::core::personality::CUSTOM_LABEL) {
        if prompt.is_empty() {
            return Command::Usage(ADDFRIEND_USAGE);
        }
        FriendPrompt::Custom(prompt.to_string())
    } else {
        FriendPrompt::from_name(Some(kind).filter(|k| !k.is_empty()))
    };

    Command::AddFriend {
        name: name.to_string(),
        prompt,
    }
}

pub fn execute(session: &mut ChatSession, command: Command) -> CommandResult {
    use handlers::{friends, session as chat};

    let text = match command {
        Command::SelectProvider(kind) => chat::select_provider(session, kind),
        Command::Personality(None) => chat::personality_usage(),
        Command::Personality(Some(name)) => chat::set_personality(session, &name),
        Command::Personalities => chat::list_personalities(session),
        Command::Custom(prompt) => chat::set_custom(session, &prompt),
        Command::AddFriend { name, prompt } => friends::add(session, &name, prompt),
        Command::Friends => friends::list(session),
        Command::Befriend(name) => friends::befriend(session, &name),
        Command::Back => friends::back(session),
        Command::RemoveFriend(name) => friends::remove(session, &name),
        Command::GroupChat(names) => friends::start_group(session, &names),
        Command::EndGroupChat => friends::end_group(session),
        Command::Clear => chat::clear(session),
        Command::History => chat::history(session),
        Command::Help => handlers::help_text(),
        Command::Quit => return CommandResult::Quit,
        Command::Usage(usage) => usage.to_string(),
        Command::Unknown(name) => {
            format!("Unknown command: /{name}. Type /help for available commands.")
        }
    };
    CommandResult::Reply(text)
}

#[cfg(test)]
mod tests;
