use super::*;
use crate::core::chat::TurnReply;
use crate::core::personality::{MainPersonality, Personality};
use crate::core::session::SessionState;
use crate::provider::testing::{handle, ScriptedProvider};
use crate::provider::ProviderSet;

fn claude_session() -> ChatSession {
    let providers = ProviderSet::new(Some(handle(ScriptedProvider::new())), None);
    ChatSession::new(providers, ProviderKind::Claude, MainPersonality::default())
}

fn run(session: &mut ChatSession, line: &str) -> String {
    let Input::Command(command) = parse_input(line) else {
        panic!("{line} is not a command");
    };
    match execute(session, command) {
        CommandResult::Reply(text) => text,
        CommandResult::Quit => "<quit>".to_string(),
    }
}

#[test]
fn plain_text_and_blank_lines_are_not_commands() {
    assert_eq!(parse_input("   "), Input::Blank);
    assert_eq!(
        parse_input("  hello there "),
        Input::Message("hello there".to_string())
    );
    assert_eq!(parse_input("/"), Input::Message("/".to_string()));
}

#[test]
fn every_registered_name_parses_to_a_known_command() {
    for spec in all_commands() {
        for name in spec.names {
            let command = parse_command(name, "Alex Sam");
            assert!(
                !matches!(command, Command::Unknown(_)),
                "/{name} parsed as unknown"
            );
        }
    }
}

#[test]
fn registry_ids_and_names_are_unique() {
    let specs = all_commands();
    for (i, spec) in specs.iter().enumerate() {
        for other in &specs[i + 1..] {
            assert_ne!(spec.id, other.id, "{} registered twice", spec.usage);
            for name in spec.names {
                assert!(
                    !other.names.iter().any(|n| n.eq_ignore_ascii_case(name)),
                    "/{name} is claimed by two commands"
                );
            }
        }
    }
}

#[test]
fn aliases_parse_like_their_primary_name() {
    for spec in all_commands() {
        let primary = parse_command(spec.names[0], "Alex Sam");
        for alias in &spec.names[1..] {
            assert_eq!(parse_command(alias, "Alex Sam"), primary, "/{alias}");
        }
    }
    assert_eq!(
        find_command("GPT").map(|spec| spec.id),
        Some(CommandId::ChatGpt)
    );
}

#[test]
fn names_are_case_insensitive_but_arguments_keep_case() {
    assert_eq!(
        parse_input("/BEFRIEND Alex"),
        Input::Command(Command::Befriend("Alex".to_string()))
    );
    assert_eq!(
        parse_input("/GPT"),
        Input::Command(Command::SelectProvider(ProviderKind::ChatGpt))
    );
    assert_eq!(parse_input("/exit"), Input::Command(Command::Quit));
}

#[test]
fn addfriend_parses_template_and_custom_prompts() {
    assert_eq!(
        parse_command("addfriend", "Alex funny"),
        Command::AddFriend {
            name: "Alex".to_string(),
            prompt: FriendPrompt::Template(Personality::Funny),
        }
    );
    assert_eq!(
        parse_command("addfriend", "Sam"),
        Command::AddFriend {
            name: "Sam".to_string(),
            prompt: FriendPrompt::Template(Personality::Casual),
        }
    );
    assert_eq!(
        parse_command("addfriend", "Robo custom You are a  robot."),
        Command::AddFriend {
            name: "Robo".to_string(),
            prompt: FriendPrompt::Custom("You are a  robot.".to_string()),
        }
    );
    assert!(matches!(
        parse_command("addfriend", "Robo custom"),
        Command::Usage(_)
    ));
}

#[test]
fn missing_arguments_report_usage_without_side_effects() {
    let mut session = claude_session();
    for line in ["/addfriend", "/befriend", "/removefriend", "/groupchat", "/custom"] {
        let text = run(&mut session, line);
        assert!(text.starts_with("Usage: /"), "{line} gave {text}");
    }
    assert!(session.personas().is_empty());
    assert!(!session.in_group_chat());
}

#[test]
fn unknown_command_is_reported() {
    let mut session = claude_session();
    assert_eq!(
        run(&mut session, "/dance now"),
        "Unknown command: /dance. Type /help for available commands."
    );
}

#[test]
fn help_lists_every_command() {
    let mut session = claude_session();
    let help = run(&mut session, "/help");
    for spec in all_commands() {
        assert!(help.contains(spec.usage), "help is missing {}", spec.usage);
    }
    assert!(help.contains("(also /gpt)"));
}

#[test]
fn selecting_unconfigured_provider_fails() {
    let mut session = claude_session();
    assert_eq!(
        run(&mut session, "/chatgpt"),
        "❌ ChatGPT not available (check API key)"
    );
    assert_eq!(session.provider(), ProviderKind::Claude);
    assert_eq!(run(&mut session, "/claude"), "✓ Switched to Claude");
}

#[test]
fn friend_lifecycle_through_commands() {
    let mut session = claude_session();

    assert_eq!(
        run(&mut session, "/addfriend Alex funny"),
        "✓ Friend 'Alex' added with funny personality!"
    );
    assert_eq!(
        run(&mut session, "/befriend Alex"),
        "✓ Switched to Alex's perspective"
    );
    assert!(run(&mut session, "/friends").contains("• Alex (active): funny personality"));
    assert_eq!(
        run(&mut session, "/back"),
        "✓ Switched back to main AI chatbot"
    );
    assert_eq!(
        run(&mut session, "/back"),
        "You're already using the main AI chatbot."
    );
    assert!(run(&mut session, "/befriend alex").contains("Friend 'alex' not found"));
    assert_eq!(
        run(&mut session, "/removefriend Alex"),
        "✓ Friend 'Alex' removed."
    );
    assert_eq!(
        run(&mut session, "/removefriend Alex"),
        "❌ Friend 'Alex' not found."
    );
}

#[test]
fn personality_command_clears_history_and_rejects_unknown_names() {
    let mut session = claude_session();
    session.add_friend("Alex", FriendPrompt::from_name(None));
    session.switch_to_friend("Alex").unwrap();

    let text = run(&mut session, "/personality wise");

    assert!(text.contains("✓ Personality changed to: wise"));
    assert_eq!(session.controller().state(), &SessionState::MainAssistant);
    assert!(run(&mut session, "/personality grumpy").contains("Unknown personality: grumpy"));
    assert_eq!(
        session.personality(),
        &MainPersonality::Named(Personality::Wise)
    );
    assert!(run(&mut session, "/personality").starts_with("Usage: /personality <name>"));
    assert!(run(&mut session, "/personalities").contains("WISE (current):"));
}

#[tokio::test]
async fn history_truncates_long_entries() {
    let mut session = claude_session();
    let long = "x".repeat(150);
    session.send(&long).await;

    let text = run(&mut session, "/history");

    assert!(text.contains(&format!("1. You: {}...", "x".repeat(100))));
    assert!(text.contains("2. AI: echo: "));

    assert_eq!(run(&mut session, "/clear"), "Conversation history cleared!");
    assert_eq!(run(&mut session, "/history"), "No conversation history yet.");
}

#[tokio::test]
async fn group_chat_commands_drive_group_mode() {
    let mut session = claude_session();
    run(&mut session, "/addfriend A funny");
    run(&mut session, "/addfriend B wise");

    assert_eq!(
        run(&mut session, "/groupchat A ghost B"),
        "✓ Group chat started with: A, B\nFriends will take turns responding. Type /endgroupchat to stop."
    );
    assert!(matches!(session.send("hi").await, TurnReply::Group(replies) if replies.len() == 2));

    assert_eq!(run(&mut session, "/endgroupchat"), "✓ Group chat ended");
    assert_eq!(run(&mut session, "/endgroupchat"), "✓ Group chat ended");
    assert_eq!(
        run(&mut session, "/groupchat nobody"),
        "❌ No valid friends found. Add friends first with /addfriend"
    );
}

#[test]
fn quit_ends_the_loop() {
    let mut session = claude_session();
    assert_eq!(run(&mut session, "/quit"), "<quit>");
}
