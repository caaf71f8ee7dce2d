use crate::core::config::Config;
use crate::provider::{
    anthropic, openai, AnthropicProvider, OpenAiProvider, ProviderHandle, ProviderKind,
    ProviderSet,
};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const QUICK_FIXES: &[&str] = &[
    "export ANTHROPIC_API_KEY=sk-ant-...   # Enable Claude",
    "export OPENAI_API_KEY=sk-...          # Enable ChatGPT",
    "friendchat set default-provider claude",
];

/// Credentials and endpoints read from the environment.
#[derive(Clone, Debug, Default)]
pub struct ProviderEnv {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub openai_base_url: Option<String>,
}

impl ProviderEnv {
    /// Process environment first, then a `.env` file in the current
    /// directory or one of its parents.
    pub fn load() -> Self {
        let file = read_dotenv();
        Self::from_sources(|name| std::env::var(name).ok(), &file)
    }

    fn from_sources(
        process: impl Fn(&str) -> Option<String>,
        file: &HashMap<String, String>,
    ) -> Self {
        let lookup =
            |name: &str| clean(process(name)).or_else(|| clean(file.get(name).cloned()));
        Self {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY"),
            openai_api_key: lookup("OPENAI_API_KEY"),
            anthropic_base_url: lookup("ANTHROPIC_BASE_URL"),
            openai_base_url: lookup("OPENAI_BASE_URL"),
        }
    }
}

/// Blank values count as unset.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_dotenv() -> HashMap<String, String> {
    match dotenvy::dotenv_iter() {
        Ok(iter) => collect_env_file(iter),
        Err(err) => {
            if !err.not_found() {
                warn!(error = %err, "could not open .env");
            }
            HashMap::new()
        }
    }
}

/// Variables up to the first line that fails to parse.
fn collect_env_file(
    entries: impl Iterator<Item = dotenvy::Result<(String, String)>>,
) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => {
                warn!(error = %err, "stopped reading .env");
                break;
            }
        }
    }
    if !vars.is_empty() {
        debug!(count = vars.len(), "read variables from .env");
    }
    vars
}

#[derive(Debug)]
pub struct ProviderResolutionError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl ProviderResolutionError {
    pub fn missing_authentication() -> Self {
        Self::new(
            "❌ No AI providers configured: neither ANTHROPIC_API_KEY nor OPENAI_API_KEY is set\n\nSet at least one of them:\n   export ANTHROPIC_API_KEY=\"your-api-key-here\"\n   export OPENAI_API_KEY=\"your-api-key-here\"",
            QUICK_FIXES,
            2,
        )
    }

    pub fn provider_not_configured(provider: ProviderKind) -> Self {
        let variable = match provider {
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
            ProviderKind::ChatGpt => "OPENAI_API_KEY",
        };
        Self::new(
            format!(
                "No API key found for provider '{}'. Set {variable} to use it.",
                provider.display_name()
            ),
            QUICK_FIXES,
            2,
        )
    }

    pub fn unknown_provider(name: &str) -> Self {
        Self::new(
            format!("Unknown provider '{name}'. Use 'claude' or 'chatgpt'."),
            &[],
            2,
        )
    }

    pub fn client_setup(err: reqwest::Error) -> Self {
        Self::new(format!("Failed to set up the HTTP client: {err}"), &[], 1)
    }

    fn new(
        message: impl Into<String>,
        quick_fixes: &'static [&'static str],
        exit_code: i32,
    ) -> Self {
        Self {
            message: message.into(),
            quick_fixes,
            exit_code,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl fmt::Display for ProviderResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ProviderResolutionError {}

/// Build a handle for every provider that has a key. An empty set is not an
/// error here; callers decide whether they can run without providers.
pub fn build_providers(
    env: &ProviderEnv,
    config: &Config,
) -> Result<ProviderSet, ProviderResolutionError> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(ProviderResolutionError::client_setup)?;

    let claude = env.anthropic_api_key.as_ref().map(|key| {
        let base_url = env
            .anthropic_base_url
            .as_deref()
            .unwrap_or(anthropic::DEFAULT_BASE_URL);
        debug!(base_url, "Claude configured");
        ProviderHandle::new(
            Arc::new(AnthropicProvider::new(http.clone(), key, base_url)),
            config.model_plan(ProviderKind::Claude),
        )
    });

    let chatgpt = env.openai_api_key.as_ref().map(|key| {
        let base_url = env
            .openai_base_url
            .as_deref()
            .unwrap_or(openai::DEFAULT_BASE_URL);
        debug!(base_url, "ChatGPT configured");
        ProviderHandle::new(
            Arc::new(OpenAiProvider::new(http.clone(), key, base_url)),
            config.model_plan(ProviderKind::ChatGpt),
        )
    });

    let providers = ProviderSet::new(claude, chatgpt);
    info!(configured = ?providers.configured(), "providers resolved");
    Ok(providers)
}

/// The provider a new session starts on.
///
/// An explicit override must name a configured provider. Otherwise the
/// configured default is used as-is (routing falls back with a notice if it
/// has no key), and with no default Claude wins when it has a key.
pub fn choose_default_provider(
    providers: &ProviderSet,
    config: &Config,
    provider_override: Option<&str>,
) -> Result<ProviderKind, ProviderResolutionError> {
    if providers.is_empty() {
        return Err(ProviderResolutionError::missing_authentication());
    }

    if let Some(name) = provider_override.filter(|value| !value.trim().is_empty()) {
        let kind = ProviderKind::from_name(name)
            .ok_or_else(|| ProviderResolutionError::unknown_provider(name))?;
        if !providers.is_configured(kind) {
            return Err(ProviderResolutionError::provider_not_configured(kind));
        }
        return Ok(kind);
    }

    if let Some(kind) = config.preferred_provider() {
        return Ok(kind);
    }

    if providers.is_configured(ProviderKind::Claude) {
        Ok(ProviderKind::Claude)
    } else {
        Ok(ProviderKind::ChatGpt)
    }
}

/// Default for sessions that must exist even without credentials (HTTP).
pub fn fallback_default_provider(providers: &ProviderSet, config: &Config) -> ProviderKind {
    choose_default_provider(providers, config, None).unwrap_or(ProviderKind::Claude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(anthropic: bool, openai: bool) -> ProviderEnv {
        ProviderEnv {
            anthropic_api_key: anthropic.then(|| "sk-ant-test".to_string()),
            openai_api_key: openai.then(|| "sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn env_file_fills_in_what_the_process_lacks() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "ANTHROPIC_API_KEY=sk-ant-file\nOPENAI_API_KEY=sk-file\nOPENAI_BASE_URL=   \n",
        )
        .unwrap();
        let file = collect_env_file(dotenvy::from_path_iter(&path).unwrap());

        let loaded = ProviderEnv::from_sources(
            |name| match name {
                "OPENAI_API_KEY" => Some("sk-process".to_string()),
                "ANTHROPIC_API_KEY" => Some("  ".to_string()),
                _ => None,
            },
            &file,
        );

        assert_eq!(loaded.anthropic_api_key.as_deref(), Some("sk-ant-file"));
        assert_eq!(loaded.openai_api_key.as_deref(), Some("sk-process"));
        assert_eq!(loaded.openai_base_url, None);
        assert_eq!(loaded.anthropic_base_url, None);
    }

    #[test]
    fn env_file_stops_at_a_bad_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OPENAI_API_KEY=sk-file\nnot a valid line\nLATER=x\n").unwrap();

        let file = collect_env_file(dotenvy::from_path_iter(&path).unwrap());

        assert_eq!(file.get("OPENAI_API_KEY").map(String::as_str), Some("sk-file"));
        assert!(!file.contains_key("LATER"));
    }

    #[test]
    fn only_keyed_providers_are_built() {
        let providers = build_providers(&env(false, true), &Config::default()).unwrap();
        assert_eq!(providers.configured(), vec![ProviderKind::ChatGpt]);

        let none = build_providers(&env(false, false), &Config::default()).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn claude_is_default_when_keyed() {
        let providers = build_providers(&env(true, true), &Config::default()).unwrap();
        assert_eq!(
            choose_default_provider(&providers, &Config::default(), None).unwrap(),
            ProviderKind::Claude
        );

        let providers = build_providers(&env(false, true), &Config::default()).unwrap();
        assert_eq!(
            choose_default_provider(&providers, &Config::default(), None).unwrap(),
            ProviderKind::ChatGpt
        );
    }

    #[test]
    fn configured_default_wins_over_key_order() {
        let config = Config {
            default_provider: Some("chatgpt".to_string()),
            ..Default::default()
        };
        let providers = build_providers(&env(true, true), &config).unwrap();

        assert_eq!(
            choose_default_provider(&providers, &config, None).unwrap(),
            ProviderKind::ChatGpt
        );
    }

    #[test]
    fn override_must_be_known_and_configured() {
        let providers = build_providers(&env(true, false), &Config::default()).unwrap();

        let err = choose_default_provider(&providers, &Config::default(), Some("gpt")).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert_eq!(err.exit_code(), 2);

        let err =
            choose_default_provider(&providers, &Config::default(), Some("gemini")).unwrap_err();
        assert!(err.to_string().contains("Unknown provider 'gemini'"));
    }

    #[test]
    fn no_credentials_reports_quick_fixes() {
        let providers = ProviderSet::default();
        let err = choose_default_provider(&providers, &Config::default(), None).unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(!err.quick_fixes().is_empty());
        assert_eq!(
            fallback_default_provider(&providers, &Config::default()),
            ProviderKind::Claude
        );
    }
}
