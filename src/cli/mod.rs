//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod repl;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::core::chat::ChatSession;
use crate::core::config::Config;
use crate::core::conversation::ReplyStatus;
use crate::core::personality::{available_names, Personality};
use crate::core::providers::{
    build_providers, choose_default_provider, ProviderEnv, ProviderResolutionError,
};
use crate::logging::{init_tracing, CHAT_FILTER, SERVE_FILTER};
use crate::server::{serve, ServerOptions};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "friendchat")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Chat with Claude or ChatGPT, with personalities and AI friends")]
#[command(
    long_about = "friendchat is a command-line chatbot that talks to Anthropic's Claude or \
OpenAI's ChatGPT. Pick a personality for the assistant, add named AI friends with their own \
personalities and memories, or put several friends in a group chat.\n\n\
Environment Variables:\n\
  ANTHROPIC_API_KEY    Enables Claude\n\
  OPENAI_API_KEY       Enables ChatGPT\n\
  ANTHROPIC_BASE_URL   Custom Anthropic API base URL (optional)\n\
  OPENAI_BASE_URL      Custom OpenAI API base URL (optional)\n\
  FRIENDCHAT_CONFIG    Path to the config file (optional)\n\
  RUST_LOG             Diagnostic log filter (optional)\n\
Keys may also be placed in a .env file in the working directory.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Ctrl+C            Cancel a pending reply, or quit at the prompt\n\
  /help             Show chat commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to use for this run (claude or chatgpt)
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Personality for the main assistant for this run
    #[arg(long, global = true, value_name = "NAME")]
    pub personality: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Serve the chat page and JSON API over HTTP
    Serve {
        /// Address to bind (default 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default 5500)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send one message and print the reply
    Say {
        /// The message; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or list them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.unwrap_or(Commands::Chat);
    let filter = match command {
        Commands::Serve { .. } => SERVE_FILTER,
        _ => CHAT_FILTER,
    };
    init_tracing(filter);

    match command {
        Commands::Set { key, value } => {
            if let Err(err) = settings::run_set(key.as_deref(), &value) {
                err.print();
                std::process::exit(err.exit_code());
            }
            Ok(())
        }
        Commands::Unset { key } => {
            if let Err(err) = settings::run_unset(&key) {
                err.print();
                std::process::exit(err.exit_code());
            }
            Ok(())
        }
        Commands::Chat => {
            let config = load_run_config(args.personality.as_deref())?;
            let session = start_session(&config, args.provider.as_deref());
            repl::run_chat(session).await
        }
        Commands::Say { prompt } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                eprintln!("Usage: friendchat say <prompt>");
                std::process::exit(1);
            }
            let config = load_run_config(args.personality.as_deref())?;
            let mut session = start_session(&config, args.provider.as_deref());
            run_say(&mut session, &prompt).await
        }
        Commands::Serve { host, port } => {
            let config = load_run_config(args.personality.as_deref())?;
            let providers = resolve_or_exit(build_providers(
                &ProviderEnv::load(),
                &config,
            ));
            if providers.is_empty() {
                eprintln!("⚠️  No API keys set; chat requests will be answered with 503 until one is.");
            }
            let options = ServerOptions {
                host: host.unwrap_or_else(|| config.server_host().to_string()),
                port: port.unwrap_or_else(|| config.server_port()),
                provider_override: args.provider,
            };
            serve(options, config, providers).await
        }
    }
}

/// Config for this run, with a `--personality` override applied.
fn load_run_config(personality: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::load()?;
    if let Some(name) = personality {
        let Some(personality) = Personality::from_name(name) else {
            eprintln!("❌ Unknown personality: {name}");
            eprintln!("Available personalities: {}", available_names());
            std::process::exit(1);
        };
        config.default_personality = Some(personality.as_str().to_string());
    }
    Ok(config)
}

fn start_session(config: &Config, provider_override: Option<&str>) -> ChatSession {
    let providers = resolve_or_exit(build_providers(&ProviderEnv::load(), config));
    let provider = resolve_or_exit(choose_default_provider(
        &providers,
        config,
        provider_override,
    ));
    ChatSession::from_config(providers, provider, config)
}

fn resolve_or_exit<T>(result: Result<T, ProviderResolutionError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{err}");
            let fixes = err.quick_fixes();
            if !fixes.is_empty() {
                eprintln!();
                eprintln!("💡 Quick fixes:");
                for fix in fixes {
                    eprintln!("  • {fix}");
                }
            }
            std::process::exit(err.exit_code());
        }
    }
}

async fn run_say(session: &mut ChatSession, prompt: &str) -> Result<(), Box<dyn Error>> {
    let reply = session.get_response(prompt).await;
    if let Some(notice) = &reply.notice {
        eprintln!("{notice}");
    }
    match reply.status {
        ReplyStatus::Answered => {}
        ReplyStatus::Empty => {
            eprintln!("❌ No response received.");
            std::process::exit(1);
        }
        ReplyStatus::ProviderFailed(_) | ReplyStatus::NoProvider => {
            eprintln!("❌ {}", reply.text);
            std::process::exit(1);
        }
    }
    println!("{}", reply.text);
    Ok(())
}

#[cfg(test)]
mod tests;
