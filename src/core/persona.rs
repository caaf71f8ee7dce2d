use crate::core::message::{History, Message};
use std::error::Error;
use std::fmt;

/// A named friend: its own system prompt and its own conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    /// Template name the prompt came from, or `custom`
    pub personality: String,
    pub system_prompt: String,
    pub history: History,
}

/// One row of [`PersonaStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaSummary {
    pub name: String,
    pub personality: String,
    pub prompt_preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaError {
    NotFound { name: String, available: Vec<String> },
}

impl fmt::Display for PersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaError::NotFound { name, available } => {
                write!(f, "Friend '{name}' not found.")?;
                if available.is_empty() {
                    write!(f, " Use /addfriend to create them.")
                } else {
                    write!(f, " Available friends: {}", available.join(", "))
                }
            }
        }
    }
}

impl Error for PersonaError {}

/// Whether [`PersonaStore::add`] created a new friend or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Replaced,
}

const PROMPT_PREVIEW_CHARS: usize = 60;

/// Every friend's at-rest state. Histories handed out or taken in are always
/// copies; nothing outside the store aliases a stored history.
#[derive(Debug, Default)]
pub struct PersonaStore {
    personas: Vec<Persona>,
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a friend. Re-adding an existing name replaces its prompt and
    /// starts it over with an empty history.
    pub fn add(
        &mut self,
        name: &str,
        personality: &str,
        system_prompt: impl Into<String>,
    ) -> AddOutcome {
        let persona = Persona {
            name: name.to_string(),
            personality: personality.to_string(),
            system_prompt: system_prompt.into(),
            history: History::new(),
        };

        match self.personas.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                *existing = persona;
                AddOutcome::Replaced
            }
            None => {
                self.personas.push(persona);
                AddOutcome::Added
            }
        }
    }

    /// Returns `false` when no friend had that name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.personas.len();
        self.personas.retain(|p| p.name != name);
        self.personas.len() != before
    }

    pub fn get(&self, name: &str) -> Result<&Persona, PersonaError> {
        self.personas
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| self.not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.personas.iter().any(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.personas.iter().map(|p| p.name.clone()).collect()
    }

    pub fn list(&self) -> Vec<PersonaSummary> {
        self.personas
            .iter()
            .map(|p| PersonaSummary {
                name: p.name.clone(),
                personality: p.personality.clone(),
                prompt_preview: crate::utils::text::preview(
                    &p.system_prompt,
                    PROMPT_PREVIEW_CHARS,
                ),
            })
            .collect()
    }

    /// Copy of a friend's prompt and history, ready to become a working context.
    pub fn check_out(&self, name: &str) -> Result<(String, History), PersonaError> {
        let persona = self.get(name)?;
        Ok((persona.system_prompt.clone(), persona.history.clone()))
    }

    /// Store a working history back into its friend's slot. A friend removed
    /// while its history was checked out stays removed.
    pub fn check_in(&mut self, name: &str, history: &[Message]) -> bool {
        match self.personas.iter_mut().find(|p| p.name == name) {
            Some(persona) => {
                persona.history = history.to_vec();
                true
            }
            None => false,
        }
    }

    fn not_found(&self, name: &str) -> PersonaError {
        PersonaError::NotFound {
            name: name.to_string(),
            available: self.names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_friends() -> PersonaStore {
        let mut store = PersonaStore::new();
        store.add("Alex", "funny", "You are Alex.");
        store.add("Sam", "wise", "You are Sam.");
        store
    }

    #[test]
    fn add_then_get_returns_fresh_persona() {
        let store = store_with_friends();
        let alex = store.get("Alex").expect("Alex registered");
        assert_eq!(alex.system_prompt, "You are Alex.");
        assert_eq!(alex.personality, "funny");
        assert!(alex.history.is_empty());
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = store_with_friends();
        assert!(store.get("alex").is_err());
    }

    #[test]
    fn re_adding_replaces_prompt_and_resets_history() {
        let mut store = store_with_friends();
        store.check_in("Alex", &[Message::user("hi"), Message::assistant("yo")]);

        let outcome = store.add("Alex", "casual", "You are new Alex.");

        assert_eq!(outcome, AddOutcome::Replaced);
        let alex = store.get("Alex").unwrap();
        assert_eq!(alex.system_prompt, "You are new Alex.");
        assert!(alex.history.is_empty());
        assert_eq!(store.names(), vec!["Alex", "Sam"]);
    }

    #[test]
    fn remove_reports_missing_names() {
        let mut store = store_with_friends();
        assert!(store.remove("Alex"));
        assert!(!store.remove("Alex"));
        assert!(!store.contains("Alex"));
    }

    #[test]
    fn not_found_lists_available_friends() {
        let store = store_with_friends();
        let err = store.get("ghost").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Friend 'ghost' not found"));
        assert!(text.contains("Alex, Sam"));

        let empty = PersonaStore::new();
        assert!(empty
            .get("ghost")
            .unwrap_err()
            .to_string()
            .contains("/addfriend"));
    }

    #[test]
    fn checked_out_history_is_a_copy() {
        let mut store = store_with_friends();
        store.check_in("Sam", &[Message::user("hello")]);

        let (_, mut working) = store.check_out("Sam").unwrap();
        working.push(Message::assistant("not yet saved"));

        assert_eq!(store.get("Sam").unwrap().history.len(), 1);
    }

    #[test]
    fn check_in_ignores_removed_friends() {
        let mut store = store_with_friends();
        store.remove("Sam");
        assert!(!store.check_in("Sam", &[Message::user("late")]));
        assert!(!store.contains("Sam"));
    }

    #[test]
    fn list_keeps_insertion_order() {
        let store = store_with_friends();
        let names: Vec<String> = store.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alex", "Sam"]);
    }
}
