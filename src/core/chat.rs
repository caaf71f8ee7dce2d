//! One user's whole chat: the friends, the live context, group mode and the
//! provider choice. Both transports drive a `ChatSession` and nothing else.

use tracing::info;

use crate::core::config::Config;
use crate::core::conversation::ChatReply;
use crate::core::group::{GroupChat, GroupError, GroupReply};
use crate::core::message::Message;
use crate::core::persona::{AddOutcome, PersonaError, PersonaStore, PersonaSummary};
use crate::core::personality::{MainPersonality, Personality, CUSTOM_LABEL};
use crate::core::session::{BackOutcome, PersonalityChange, SessionController, SessionError};
use crate::provider::{ProviderKind, ProviderSet};

/// Personality a friend gets when none (or an unknown one) is given.
pub const DEFAULT_FRIEND_PERSONALITY: Personality = Personality::Casual;

/// Where a new friend's system prompt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendPrompt {
    Template(Personality),
    Custom(String),
}

impl FriendPrompt {
    /// Resolve a template name, falling back to the default friend
    /// personality for unknown or missing names.
    pub fn from_name(name: Option<&str>) -> Self {
        FriendPrompt::Template(
            name.and_then(Personality::from_name)
                .unwrap_or(DEFAULT_FRIEND_PERSONALITY),
        )
    }

    pub fn label(&self) -> &str {
        match self {
            FriendPrompt::Template(personality) => personality.as_str(),
            FriendPrompt::Custom(_) => CUSTOM_LABEL,
        }
    }

    pub fn system_prompt(&self) -> &str {
        match self {
            FriendPrompt::Template(personality) => personality.system_prompt(),
            FriendPrompt::Custom(prompt) => prompt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound,
    Removed {
        /// The friend was live; the main assistant is live now
        was_active: bool,
        /// The friend was in the group list
        left_group: bool,
        /// Removing it emptied the group list
        group_ended: bool,
    },
}

/// What a plain message produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReply {
    Single {
        /// Friend that answered, or `None` for the main assistant
        speaker: Option<String>,
        reply: ChatReply,
    },
    Group(Vec<GroupReply>),
}

pub struct ChatSession {
    providers: ProviderSet,
    provider: ProviderKind,
    personas: PersonaStore,
    controller: SessionController,
    group: GroupChat,
}

impl ChatSession {
    pub fn new(providers: ProviderSet, provider: ProviderKind, personality: MainPersonality) -> Self {
        Self {
            providers,
            provider,
            personas: PersonaStore::new(),
            controller: SessionController::new(personality),
            group: GroupChat::new(),
        }
    }

    /// A session with the configured starting personality and friends.
    pub fn from_config(providers: ProviderSet, provider: ProviderKind, config: &Config) -> Self {
        let mut session = Self::new(providers, provider, config.main_personality());
        for friend in &config.friends {
            let prompt = match friend.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
                Some(prompt) => FriendPrompt::Custom(prompt.to_string()),
                None => FriendPrompt::from_name(friend.personality.as_deref()),
            };
            session.add_friend(&friend.name, prompt);
        }
        session
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Switch the session's provider. Only configured providers can be
    /// selected.
    pub fn select_provider(&mut self, kind: ProviderKind) -> bool {
        if !self.providers.is_configured(kind) {
            return false;
        }
        self.provider = kind;
        info!(provider = %kind, "provider selected");
        true
    }

    pub fn personas(&self) -> &PersonaStore {
        &self.personas
    }

    pub fn friends(&self) -> Vec<PersonaSummary> {
        self.personas.list()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn active_friend(&self) -> Option<&str> {
        self.controller.active_persona()
    }

    pub fn personality(&self) -> &MainPersonality {
        self.controller.personality()
    }

    pub fn history(&self) -> &[Message] {
        self.controller.history()
    }

    pub fn add_friend(&mut self, name: &str, prompt: FriendPrompt) -> AddOutcome {
        let outcome = self
            .personas
            .add(name, prompt.label(), prompt.system_prompt());
        if outcome == AddOutcome::Replaced {
            self.controller
                .on_persona_replaced(name, prompt.system_prompt());
        }
        info!(friend = name, personality = prompt.label(), ?outcome, "friend added");
        outcome
    }

    pub fn remove_friend(&mut self, name: &str) -> RemoveOutcome {
        if !self.personas.remove(name) {
            return RemoveOutcome::NotFound;
        }

        let was_active = self.controller.on_persona_removed(name);
        let left_group = self.group.members().iter().any(|m| m == name);
        self.group.on_persona_removed(name);
        let group_ended = left_group && !self.group.is_active();

        info!(friend = name, was_active, left_group, "friend removed");
        RemoveOutcome::Removed {
            was_active,
            left_group,
            group_ended,
        }
    }

    pub fn switch_to_friend(&mut self, name: &str) -> Result<(), PersonaError> {
        self.controller.switch_to_persona(&mut self.personas, name)
    }

    pub fn back_to_main(&mut self) -> BackOutcome {
        self.controller.switch_back_to_main(&mut self.personas)
    }

    pub fn set_personality(&mut self, name: &str) -> Result<PersonalityChange, SessionError> {
        self.controller.set_personality(&mut self.personas, name)
    }

    pub fn set_custom_personality(&mut self, prompt: &str) -> PersonalityChange {
        self.controller
            .set_custom_personality(&mut self.personas, prompt)
    }

    pub fn apply_personality_keep_history(&mut self, name: &str) -> bool {
        self.controller.apply_personality_keep_history(name)
    }

    pub fn clear_history(&mut self) {
        self.controller.clear_history();
    }

    pub fn group_members(&self) -> &[String] {
        self.group.members()
    }

    pub fn in_group_chat(&self) -> bool {
        self.group.is_active()
    }

    pub fn start_group_chat<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Vec<String>, GroupError> {
        self.group
            .start(&self.personas, names)
            .map(|members| members.to_vec())
    }

    pub fn end_group_chat(&mut self) -> bool {
        self.group.end()
    }

    /// Answer a plain message: the whole group in group mode, otherwise the
    /// live context.
    pub async fn send(&mut self, message: &str) -> TurnReply {
        if self.group.is_active() {
            TurnReply::Group(self.run_group_turn(message).await)
        } else {
            let speaker = self.active_friend().map(str::to_string);
            let reply = self.get_response(message).await;
            TurnReply::Single { speaker, reply }
        }
    }

    /// Answer in the live context with the session's provider.
    pub async fn get_response(&mut self, message: &str) -> ChatReply {
        self.get_response_with(message, None).await
    }

    /// Answer in the live context, asking `provider_override` instead of the
    /// session's provider when given. Availability fallback still applies.
    pub async fn get_response_with(
        &mut self,
        message: &str,
        provider_override: Option<ProviderKind>,
    ) -> ChatReply {
        let provider = provider_override.unwrap_or(self.provider);
        self.controller
            .get_response(&self.providers, provider, message)
            .await
    }

    pub async fn run_group_turn(&mut self, message: &str) -> Vec<GroupReply> {
        self.run_group_turn_with(message, None).await
    }

    pub async fn run_group_turn_with(
        &mut self,
        message: &str,
        provider_override: Option<ProviderKind>,
    ) -> Vec<GroupReply> {
        let provider = provider_override.unwrap_or(self.provider);
        self.group
            .run_turn(
                &self.providers,
                provider,
                &mut self.personas,
                &mut self.controller,
                message,
            )
            .await
    }
}
