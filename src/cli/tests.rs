use super::repl::{render_turn, status_lines};
use super::settings::{SettingError, SettingRegistry};
use super::*;
use crate::core::chat::{FriendPrompt, TurnReply};
use crate::core::conversation::{ChatReply, ReplyStatus};
use crate::core::group::GroupReply;
use crate::core::personality::MainPersonality;
use crate::provider::testing::{handle, ScriptedProvider};
use crate::provider::{ProviderErrorKind, ProviderKind, ProviderSet};

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn reply(text: &str) -> ChatReply {
        ChatReply {
            text: text.to_string(),
            status: ReplyStatus::Answered,
            provider: Some(ProviderKind::Claude),
            notice: None,
        }
    }

    pub(super) fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }
}

use test_helpers::{parse_args, reply, strings};

#[test]
fn no_subcommand_means_chat() {
    let args = parse_args(&["friendchat"]);
    assert_eq!(args.command, None);
    assert_eq!(args.provider, None);
}

#[test]
fn global_flags_work_after_subcommands() {
    let args = parse_args(&["friendchat", "say", "-p", "gpt", "--personality", "wise", "hi"]);
    assert_eq!(args.provider.as_deref(), Some("gpt"));
    assert_eq!(args.personality.as_deref(), Some("wise"));
    assert_eq!(
        args.command,
        Some(Commands::Say {
            prompt: strings(&["hi"])
        })
    );
}

#[test]
fn say_collects_every_word() {
    let args = parse_args(&["friendchat", "say", "tell", "me", "-a", "joke"]);
    assert_eq!(
        args.command,
        Some(Commands::Say {
            prompt: strings(&["tell", "me", "-a", "joke"])
        })
    );
}

#[test]
fn serve_accepts_host_and_port() {
    let args = parse_args(&["friendchat", "serve", "--host", "0.0.0.0", "--port", "8080"]);
    assert_eq!(
        args.command,
        Some(Commands::Serve {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080)
        })
    );
    assert!(Args::try_parse_from(["friendchat", "serve", "--port", "nope"]).is_err());
}

#[test]
fn set_without_key_parses() {
    let args = parse_args(&["friendchat", "set"]);
    assert_eq!(
        args.command,
        Some(Commands::Set {
            key: None,
            value: Vec::new()
        })
    );
}

#[test]
fn setting_handlers_validate_and_store() {
    let registry = SettingRegistry::new();
    let mut config = Config::default();

    let provider = registry.get("default-provider").unwrap();
    let message = provider.set(&strings(&["OpenAI"]), &mut config).unwrap();
    assert_eq!(message, "✅ Set default-provider to: chatgpt");
    assert_eq!(config.default_provider.as_deref(), Some("chatgpt"));
    assert!(matches!(
        provider.set(&strings(&["gemini"]), &mut config),
        Err(SettingError::UnknownProvider { .. })
    ));

    let personality = registry.get("default-personality").unwrap();
    personality.set(&strings(&["Kid-Friendly"]), &mut config).unwrap();
    assert_eq!(config.default_personality.as_deref(), Some("kid-friendly"));
    assert!(matches!(
        personality.set(&[], &mut config),
        Err(SettingError::MissingArgs { .. })
    ));

    let model = registry.get("openai-model").unwrap();
    model.set(&strings(&["gpt-4o"]), &mut config).unwrap();
    assert_eq!(config.openai_model.as_deref(), Some("gpt-4o"));
    assert_eq!(model.unset(&mut config).unwrap(), "✅ Unset openai-model");
    assert_eq!(config.openai_model, None);
}

#[test]
fn registry_lists_keys_in_display_order() {
    let registry = SettingRegistry::new();
    assert_eq!(
        registry.keys_display_order(),
        &["default-provider", "default-personality", "claude-model", "openai-model"]
    );
    assert!(registry.get("theme").is_none());

    let lines = registry.format_all(&Config::default());
    assert_eq!(lines[0], "  default-provider: (unset)");
}

#[test]
fn single_reply_uses_speaker_and_notice() {
    let mut answered = reply("Hello!");
    answered.notice = Some("⚠ Claude not available, using ChatGPT instead...".to_string());
    let text = render_turn(&TurnReply::Single {
        speaker: None,
        reply: answered,
    });
    assert_eq!(
        text,
        "⚠ Claude not available, using ChatGPT instead...\nAI: Hello!"
    );

    let text = render_turn(&TurnReply::Single {
        speaker: Some("Alex".to_string()),
        reply: ChatReply {
            status: ReplyStatus::Empty,
            ..reply("")
        },
    });
    assert_eq!(text, "Alex: ❌ No response received. Please try again.");
}

#[test]
fn group_replies_are_separated_by_blank_lines() {
    let failed = ChatReply {
        text: "Error with Claude API: HTTP 500".to_string(),
        status: ReplyStatus::ProviderFailed(ProviderErrorKind::Unavailable),
        provider: Some(ProviderKind::Claude),
        notice: None,
    };
    let text = render_turn(&TurnReply::Group(vec![
        GroupReply {
            name: "A".to_string(),
            reply: reply("first"),
        },
        GroupReply {
            name: "B".to_string(),
            reply: failed,
        },
    ]));

    assert_eq!(text, "A: first\n\nB: ❌ Error with Claude API: HTTP 500");
}

#[test]
fn status_lines_describe_the_live_context() {
    let providers = ProviderSet::new(Some(handle(ScriptedProvider::new())), None);
    let mut session = ChatSession::new(providers, ProviderKind::Claude, MainPersonality::default());
    session.add_friend("Alex", FriendPrompt::from_name(None));
    session.switch_to_friend("Alex").unwrap();

    let lines = status_lines(&session);

    assert_eq!(lines[0], "Current provider: CLAUDE");
    assert_eq!(lines[1], "Current friend: Alex");
    assert_eq!(lines[2], "Current personality: default");
}
