//! Session controller: which context is live, and moving histories in and
//! out of it.
//!
//! Exactly one context is live at a time. The live context's history is the
//! canonical copy; every other friend's history rests in the
//! [`PersonaStore`], and the main assistant's history rests in
//! `main_history` while a friend is live. Every switch flushes the outgoing
//! history before loading the incoming one.

use std::error::Error;
use std::fmt;

use tracing::debug;

use crate::core::conversation::{respond, ChatReply};
use crate::core::message::{History, Message};
use crate::core::persona::{PersonaError, PersonaStore};
use crate::core::personality::{available_names, MainPersonality, Personality};
use crate::provider::{ProviderKind, ProviderSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    MainAssistant,
    ActivePersona(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownPersonality { name: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownPersonality { name } => write!(
                f,
                "Unknown personality: {name}. Available personalities: {}",
                available_names()
            ),
        }
    }
}

impl Error for SessionError {}

/// Result of [`SessionController::switch_back_to_main`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    Switched { from: String },
    AlreadyMain,
}

/// Result of a personality change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalityChange {
    /// Friend that was checked back in first, if one was live
    pub left_persona: Option<String>,
    pub label: String,
}

#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    personality: MainPersonality,
    /// Main assistant history while a friend is live; empty otherwise
    main_history: History,
    system_prompt: String,
    working: History,
}

impl SessionController {
    pub fn new(personality: MainPersonality) -> Self {
        Self {
            state: SessionState::MainAssistant,
            system_prompt: personality.system_prompt().to_string(),
            personality,
            main_history: History::new(),
            working: History::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active_persona(&self) -> Option<&str> {
        match &self.state {
            SessionState::ActivePersona(name) => Some(name),
            SessionState::MainAssistant => None,
        }
    }

    pub fn personality(&self) -> &MainPersonality {
        &self.personality
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The live context's history.
    pub fn history(&self) -> &[Message] {
        &self.working
    }

    /// Make `name` the live context. Switching to the friend that is already
    /// live flushes and reloads it.
    pub fn switch_to_persona(
        &mut self,
        store: &mut PersonaStore,
        name: &str,
    ) -> Result<(), PersonaError> {
        let (prompt, history) = store.check_out(name)?;

        match &self.state {
            SessionState::MainAssistant => {
                self.main_history = std::mem::take(&mut self.working);
            }
            SessionState::ActivePersona(current) => {
                store.check_in(current, &self.working);
            }
        }

        // reload after flushing so a same-name switch sees the flushed turns
        let history = if self.active_persona() == Some(name) {
            self.working.clone()
        } else {
            history
        };

        debug!(persona = name, turns = history.len(), "persona checked out");
        self.state = SessionState::ActivePersona(name.to_string());
        self.system_prompt = prompt;
        self.working = history;
        Ok(())
    }

    pub fn switch_back_to_main(&mut self, store: &mut PersonaStore) -> BackOutcome {
        let SessionState::ActivePersona(name) = &self.state else {
            return BackOutcome::AlreadyMain;
        };
        let name = name.clone();

        store.check_in(&name, &self.working);
        self.restore_main();
        debug!(persona = %name, "persona checked in, main assistant live");
        BackOutcome::Switched { from: name }
    }

    /// Apply a template personality to the main assistant and clear its
    /// history. A live friend is checked back in first.
    pub fn set_personality(
        &mut self,
        store: &mut PersonaStore,
        name: &str,
    ) -> Result<PersonalityChange, SessionError> {
        let personality =
            Personality::from_name(name).ok_or_else(|| SessionError::UnknownPersonality {
                name: name.to_string(),
            })?;
        Ok(self.replace_personality(store, MainPersonality::Named(personality)))
    }

    pub fn set_custom_personality(
        &mut self,
        store: &mut PersonaStore,
        prompt: &str,
    ) -> PersonalityChange {
        self.replace_personality(store, MainPersonality::Custom(prompt.to_string()))
    }

    /// Change the main prompt for later turns but keep every history. Used by
    /// the HTTP channel. Unknown names are ignored and reported as `false`.
    pub fn apply_personality_keep_history(&mut self, name: &str) -> bool {
        let Some(personality) = Personality::from_name(name) else {
            return false;
        };
        self.personality = MainPersonality::Named(personality);
        if self.state == SessionState::MainAssistant {
            self.system_prompt = self.personality.system_prompt().to_string();
        }
        true
    }

    /// Empty the live history only.
    pub fn clear_history(&mut self) {
        self.working.clear();
    }

    /// Send `message` in the live context.
    pub async fn get_response(
        &mut self,
        providers: &ProviderSet,
        provider: ProviderKind,
        message: &str,
    ) -> ChatReply {
        respond(
            providers,
            provider,
            &self.system_prompt,
            &mut self.working,
            message,
        )
        .await
    }

    /// Write the live friend's history to the store without switching.
    pub fn flush(&self, store: &mut PersonaStore) {
        if let SessionState::ActivePersona(name) = &self.state {
            store.check_in(name, &self.working);
        }
    }

    /// Replace the live friend's working copy after the store changed
    /// underneath it.
    pub fn reload_persona(&mut self, name: &str, history: &History) {
        if self.active_persona() == Some(name) {
            self.working = history.clone();
        }
    }

    /// A friend was re-created with a new prompt and an empty history.
    pub fn on_persona_replaced(&mut self, name: &str, system_prompt: &str) {
        if self.active_persona() == Some(name) {
            self.system_prompt = system_prompt.to_string();
            self.working.clear();
        }
    }

    /// A friend was deleted. If it was live, fall back to the main assistant
    /// without flushing the deleted history anywhere.
    pub fn on_persona_removed(&mut self, name: &str) -> bool {
        if self.active_persona() == Some(name) {
            self.restore_main();
            true
        } else {
            false
        }
    }

    fn replace_personality(
        &mut self,
        store: &mut PersonaStore,
        personality: MainPersonality,
    ) -> PersonalityChange {
        let left_persona = match self.switch_back_to_main(store) {
            BackOutcome::Switched { from } => Some(from),
            BackOutcome::AlreadyMain => None,
        };

        self.personality = personality;
        self.system_prompt = self.personality.system_prompt().to_string();
        self.working.clear();

        PersonalityChange {
            left_persona,
            label: self.personality.label().to_string(),
        }
    }

    fn restore_main(&mut self) {
        self.state = SessionState::MainAssistant;
        self.system_prompt = self.personality.system_prompt().to_string();
        self.working = std::mem::take(&mut self.main_history);
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(MainPersonality::default())
    }
}
