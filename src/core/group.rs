//! Group chat: every listed friend answers the same message in turn, each in
//! its own isolated context.

use std::error::Error;
use std::fmt;

use tracing::{debug, info};

use crate::core::conversation::{respond, ChatReply};
use crate::core::persona::PersonaStore;
use crate::core::session::SessionController;
use crate::provider::{ProviderKind, ProviderSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    NoValidPersonas { requested: Vec<String> },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::NoValidPersonas { requested } if requested.is_empty() => {
                write!(f, "No friends given for the group chat.")
            }
            GroupError::NoValidPersonas { requested } => write!(
                f,
                "None of these are your friends: {}",
                requested.join(", ")
            ),
        }
    }
}

impl Error for GroupError {}

/// One friend's answer within a group turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReply {
    pub name: String,
    pub reply: ChatReply,
}

#[derive(Debug, Default)]
pub struct GroupChat {
    members: Option<Vec<String>>,
}

impl GroupChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.members.is_some()
    }

    pub fn members(&self) -> &[String] {
        self.members.as_deref().unwrap_or_default()
    }

    /// Enter group mode with the registered names from `names`, in order.
    /// Unknown names are skipped and repeats keep their first position. When
    /// nothing valid remains the current mode is left alone.
    pub fn start<S: AsRef<str>>(
        &mut self,
        store: &PersonaStore,
        names: &[S],
    ) -> Result<&[String], GroupError> {
        let mut members: Vec<String> = Vec::new();
        for name in names.iter().map(|n| n.as_ref()) {
            if store.contains(name) && !members.iter().any(|m| m == name) {
                members.push(name.to_string());
            }
        }

        if members.is_empty() {
            return Err(GroupError::NoValidPersonas {
                requested: names.iter().map(|n| n.as_ref().to_string()).collect(),
            });
        }

        info!(members = ?members, "group chat started");
        Ok(self.members.insert(members).as_slice())
    }

    /// Leave group mode. Safe to call when not in one.
    pub fn end(&mut self) -> bool {
        self.members.take().is_some()
    }

    /// Drop a removed friend from the list; an emptied list ends the group.
    pub fn on_persona_removed(&mut self, name: &str) {
        if let Some(members) = &mut self.members {
            members.retain(|m| m != name);
            if members.is_empty() {
                self.members = None;
            }
        }
    }

    /// Ask each member for a reply to `message`, one after another. Each
    /// member sees only its own history. The live friend, if any, is flushed
    /// first and reloaded after its own turn so its working copy never goes
    /// stale.
    pub async fn run_turn(
        &self,
        providers: &ProviderSet,
        provider: ProviderKind,
        store: &mut PersonaStore,
        controller: &mut SessionController,
        message: &str,
    ) -> Vec<GroupReply> {
        controller.flush(store);

        let mut replies = Vec::with_capacity(self.members().len());
        for name in self.members() {
            // a member removed mid-mode has already been dropped from the list
            let Ok((system_prompt, mut history)) = store.check_out(name) else {
                continue;
            };

            let reply = respond(providers, provider, &system_prompt, &mut history, message).await;
            debug!(member = %name, ok = reply.is_success(), "group member answered");

            store.check_in(name, &history);
            controller.reload_persona(name, &history);
            replies.push(GroupReply {
                name: name.clone(),
                reply,
            });
        }
        replies
    }
}
