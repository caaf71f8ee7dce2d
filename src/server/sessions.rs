//! Per-client chat sessions for the HTTP surface.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use base64::Engine;
use tracing::debug;

use super::http::HttpRequest;
use crate::core::chat::ChatSession;
use crate::core::config::Config;
use crate::provider::{ProviderKind, ProviderSet};

pub const SESSION_COOKIE: &str = "friendchat_session";
pub const SESSION_HEADER: &str = "X-Session-Id";

const SESSION_ID_BYTES: usize = 18;
const MAX_SESSION_ID_LEN: usize = 64;

pub type SharedSession = Arc<tokio::sync::Mutex<ChatSession>>;

/// A session looked up for one request.
pub struct SessionLease {
    pub id: String,
    pub session: SharedSession,
    /// The client did not present this id, so it must be told about it
    pub issued: bool,
}

struct SessionEntry {
    session: SharedSession,
    last_used: Instant,
}

/// Live HTTP sessions. Idle ones are swept on each lookup, and the least
/// recently used one makes room once `max_sessions` is reached.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    providers: ProviderSet,
    provider: ProviderKind,
    config: Config,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(providers: ProviderSet, provider: ProviderKind, config: Config) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            providers,
            provider,
            idle_timeout: config.session_idle_timeout(),
            max_sessions: config.max_sessions(),
            config,
        }
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The session named by the request's cookie or header, creating it when
    /// the id is unknown. Ids that do not look like ours are replaced.
    pub fn lease(&self, request: &HttpRequest) -> Result<SessionLease, getrandom::Error> {
        self.lease_at(request, Instant::now())
    }

    fn lease_at(
        &self,
        request: &HttpRequest,
        now: Instant,
    ) -> Result<SessionLease, getrandom::Error> {
        let presented = request
            .cookie(SESSION_COOKIE)
            .or_else(|| request.header(SESSION_HEADER))
            .filter(|id| is_valid_session_id(id));

        let (id, issued) = match presented {
            Some(id) => (id.to_string(), false),
            None => (new_session_id()?, true),
        };

        let mut sessions = self.lock();
        self.evict_idle(&mut sessions, now);
        if !sessions.contains_key(&id) && sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let entry = sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, "creating chat session");
            SessionEntry {
                session: Arc::new(tokio::sync::Mutex::new(ChatSession::from_config(
                    self.providers.clone(),
                    self.provider,
                    &self.config,
                ))),
                last_used: now,
            }
        });
        entry.last_used = now;
        let session = Arc::clone(&entry.session);

        Ok(SessionLease {
            id,
            session,
            issued,
        })
    }

    fn evict_idle(&self, sessions: &mut HashMap<String, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.saturating_duration_since(entry.last_used) < self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "dropped idle chat sessions");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        // the map holds no invariants a panicking holder could break
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn evict_least_recent(sessions: &mut HashMap<String, SessionEntry>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        debug!(session = %id, "session limit reached, dropping least recent");
        sessions.remove(&id);
    }
}

pub fn new_session_id() -> Result<String, getrandom::Error> {
    let mut bytes = [0_u8; SESSION_ID_BYTES];
    getrandom::fill(&mut bytes)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{handle, ScriptedProvider};

    fn registry() -> SessionRegistry {
        registry_with(Config::default())
    }

    fn registry_with(config: Config) -> SessionRegistry {
        let providers = ProviderSet::new(Some(handle(ScriptedProvider::new())), None);
        SessionRegistry::new(providers, ProviderKind::Claude, config)
    }

    fn request(headers: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            method: "POST".to_string(),
            path: "/api/chat".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Vec::new(),
        }
    }

    #[test]
    fn issues_urlsafe_ids() {
        let id = new_session_id().unwrap();
        assert_eq!(id.len(), 24);
        assert!(is_valid_session_id(&id));
        assert_ne!(id, new_session_id().unwrap());
    }

    #[test]
    fn requests_without_id_get_a_fresh_session() {
        let registry = registry();

        let first = registry.lease(&request(&[])).unwrap();
        let second = registry.lease(&request(&[])).unwrap();

        assert!(first.issued && second.issued);
        assert_ne!(first.id, second.id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn cookie_and_header_reuse_the_same_session() {
        let registry = registry();
        let lease = registry.lease(&request(&[])).unwrap();

        let cookie = format!("theme=dark; {SESSION_COOKIE}={}", lease.id);
        let by_cookie = registry.lease(&request(&[("Cookie", &cookie)])).unwrap();
        let by_header = registry
            .lease(&request(&[("x-session-id", &lease.id)]))
            .unwrap();

        assert!(!by_cookie.issued);
        assert!(Arc::ptr_eq(&lease.session, &by_cookie.session));
        assert!(Arc::ptr_eq(&lease.session, &by_header.session));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn client_chosen_ids_are_kept_when_well_formed() {
        let registry = registry();

        let lease = registry
            .lease(&request(&[("X-Session-Id", "my-client_1")]))
            .unwrap();
        assert_eq!(lease.id, "my-client_1");
        assert!(!lease.issued);

        let replaced = registry
            .lease(&request(&[("X-Session-Id", "bad id; Path=/")]))
            .unwrap();
        assert!(replaced.issued);
        assert_ne!(replaced.id, "bad id; Path=/");
    }

    #[test]
    fn cookie_value_is_scoped_to_the_site() {
        assert_eq!(
            session_cookie("abc"),
            "friendchat_session=abc; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let registry = registry_with(Config {
            session_idle_minutes: Some(10),
            ..Default::default()
        });
        let start = Instant::now();
        let idle = registry.lease_at(&request(&[]), start).unwrap();
        let busy = registry.lease_at(&request(&[]), start).unwrap();

        let later = start + Duration::from_secs(9 * 60);
        registry
            .lease_at(&request(&[(SESSION_HEADER, &busy.id)]), later)
            .unwrap();

        let much_later = start + Duration::from_secs(15 * 60);
        let revisit = registry
            .lease_at(&request(&[(SESSION_HEADER, &busy.id)]), much_later)
            .unwrap();
        assert!(Arc::ptr_eq(&busy.session, &revisit.session));
        assert_eq!(registry.len(), 1);

        // an expired id starts over with a fresh session
        let returned = registry
            .lease_at(&request(&[(SESSION_HEADER, &idle.id)]), much_later)
            .unwrap();
        assert!(!Arc::ptr_eq(&idle.session, &returned.session));
    }

    #[test]
    fn session_count_is_capped() {
        let registry = registry_with(Config {
            max_sessions: Some(3),
            ..Default::default()
        });
        let start = Instant::now();
        let ids: Vec<String> = (0..3)
            .map(|i| {
                registry
                    .lease_at(&request(&[]), start + Duration::from_secs(i))
                    .unwrap()
                    .id
            })
            .collect();
        // touching the oldest makes the second the least recent
        registry
            .lease_at(&request(&[(SESSION_HEADER, &ids[0])]), start + Duration::from_secs(5))
            .unwrap();
        registry
            .lease_at(&request(&[]), start + Duration::from_secs(6))
            .unwrap();

        {
            let sessions = registry.lock();
            assert_eq!(sessions.len(), 3);
            assert!(sessions.contains_key(&ids[0]));
            assert!(!sessions.contains_key(&ids[1]));
            assert!(sessions.contains_key(&ids[2]));
        }

        for i in 0..100 {
            registry
                .lease_at(&request(&[]), start + Duration::from_secs(10 + i))
                .unwrap();
        }
        assert_eq!(registry.len(), 3);
    }
}
