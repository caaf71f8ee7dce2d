use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A friend registered at startup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FriendConfig {
    pub name: String,
    /// Template name; ignored when `prompt` is set
    pub personality: Option<String>,
    /// Free-form system prompt
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// "claude" or "chatgpt"
    pub default_provider: Option<String>,
    /// Personality the main assistant starts with
    pub default_personality: Option<String>,
    pub claude_model: Option<String>,
    pub openai_model: Option<String>,
    /// Models tried in order when the preferred one is not found
    pub claude_fallback_models: Option<Vec<String>>,
    pub openai_fallback_models: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    /// HTTP sessions idle this long are forgotten
    pub session_idle_minutes: Option<u64>,
    pub max_sessions: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friends: Vec<FriendConfig>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn add_friend(&mut self, friend: FriendConfig) {
        self.friends.retain(|f| f.name != friend.name);
        self.friends.push(friend);
    }
}
