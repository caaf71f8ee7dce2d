//! friendchat is a chatbot front-end for Anthropic's Claude and OpenAI's
//! ChatGPT, reachable from a terminal or over HTTP.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`provider`] adapts the two chat-completion APIs behind one
//!   [`provider::ChatProvider`] trait and handles model fallback.
//! - [`core`] owns the conversation state: personalities, the friend persona
//!   store, the session controller, group turns, and configuration.
//! - [`commands`] parses slash commands into a closed enum and applies them to
//!   a [`core::chat::ChatSession`].
//! - [`cli`] is the command-line entrypoint and the interactive loop;
//!   [`server`] is the HTTP surface with one session per client.
//! - [`api`] defines the wire payloads used by the provider adapters.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod provider;
pub mod server;
pub mod utils;
