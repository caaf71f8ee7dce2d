//! Line-oriented interactive chat on stdin/stdout.

use std::error::Error;
use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{execute, parse_input, Command, CommandResult, Input};
use crate::core::chat::{ChatSession, TurnReply};
use crate::core::conversation::{ChatReply, ReplyStatus};
use crate::core::personality::MainPersonality;

const GOODBYE: &str = "👋 Goodbye! Thanks for chatting!";
const NO_RESPONSE: &str = "❌ No response received. Please try again.";
const MAIN_SPEAKER: &str = "AI";

pub async fn run_chat(mut session: ChatSession) -> Result<(), Box<dyn Error>> {
    print_banner(&mut session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\n{GOODBYE}");
                break;
            }
        };
        let Some(line) = line else {
            println!("\n{GOODBYE}");
            break;
        };

        match parse_input(&line) {
            Input::Blank => continue,
            Input::Command(command) => match execute(&mut session, command) {
                CommandResult::Reply(text) => println!("{text}\n"),
                CommandResult::Quit => {
                    println!("\n{GOODBYE}");
                    break;
                }
            },
            Input::Message(message) => {
                println!("\n{}", thinking_header(&session));

                // dropping the turn future commits nothing to any history
                tokio::select! {
                    turn = session.send(&message) => println!("\n{}\n", render_turn(&turn)),
                    _ = tokio::signal::ctrl_c() => {
                        debug!("reply cancelled by user");
                        println!("\n⚠ Reply cancelled.\n");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_banner(session: &mut ChatSession) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("🤖 AI-Powered Chatbot (Claude & ChatGPT)");
    println!("{rule}\n");
    if let CommandResult::Reply(help) = execute(session, Command::Help) {
        println!("{help}");
    }
    println!("\n{}\n", "-".repeat(60));
    println!("{}\n", status_lines(session).join("\n"));
}

pub(crate) fn status_lines(session: &ChatSession) -> Vec<String> {
    let mut lines = vec![format!(
        "Current provider: {}",
        session.provider().as_str().to_uppercase()
    )];
    if let Some(friend) = session.active_friend() {
        lines.push(format!("Current friend: {friend}"));
    }
    if session.in_group_chat() {
        lines.push(format!(
            "Group chat mode: {}",
            session.group_members().join(", ")
        ));
    }
    let personality = match session.personality() {
        MainPersonality::Named(p) => p.as_str(),
        MainPersonality::Custom(_) => "custom",
    };
    lines.push(format!("Current personality: {personality}"));
    lines
}

fn thinking_header(session: &ChatSession) -> String {
    if session.in_group_chat() {
        "[GROUP CHAT] Friends discussing...".to_string()
    } else {
        format!(
            "[{}] Thinking...",
            session.provider().as_str().to_uppercase()
        )
    }
}

/// Text for one answered turn, including any provider fallback notice.
pub(crate) fn render_turn(turn: &TurnReply) -> String {
    match turn {
        TurnReply::Single { speaker, reply } => {
            let speaker = speaker.as_deref().unwrap_or(MAIN_SPEAKER);
            let body = render_reply(speaker, reply);
            match &reply.notice {
                Some(notice) => format!("{notice}\n{body}"),
                None => body,
            }
        }
        TurnReply::Group(replies) => {
            let mut notices: Vec<&str> = replies
                .iter()
                .filter_map(|r| r.reply.notice.as_deref())
                .collect();
            notices.dedup();

            let bodies: Vec<String> = replies
                .iter()
                .map(|r| render_reply(&r.name, &r.reply))
                .collect();

            let mut out = notices.join("\n");
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&bodies.join("\n\n"));
            out
        }
    }
}

fn render_reply(speaker: &str, reply: &ChatReply) -> String {
    match reply.status {
        ReplyStatus::Answered => format!("{speaker}: {}", reply.text),
        ReplyStatus::Empty => format!("{speaker}: {NO_RESPONSE}"),
        ReplyStatus::ProviderFailed(_) | ReplyStatus::NoProvider => {
            format!("{speaker}: ❌ {}", reply.text)
        }
    }
}
