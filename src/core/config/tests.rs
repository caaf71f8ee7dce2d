use super::data::{Config, FriendConfig};
use super::defaults::{
    DEFAULT_MAX_SESSIONS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_PORT,
    DEFAULT_SESSION_IDLE_MINUTES,
};
use super::io::ConfigError;
use crate::core::personality::{MainPersonality, Personality};
use crate::provider::{anthropic, openai, ProviderKind};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        default_provider: Some("chatgpt".to_string()),
        default_personality: Some("wise".to_string()),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.default_provider.as_deref(), Some("chatgpt"));
    assert_eq!(loaded.default_personality.as_deref(), Some("wise"));

    let mut config = loaded;
    config.default_provider = None;
    config
        .save_to_path(&config_path)
        .expect("Failed to save unset config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load unset config");
    assert_eq!(loaded.default_provider, None);
    // other fields survive an unset
    assert_eq!(loaded.default_personality.as_deref(), Some("wise"));
}

#[test]
fn test_friends_table_parses() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
default_provider = "claude"

[[friends]]
name = "Alex"
personality = "funny"

[[friends]]
name = "Robo"
prompt = "You are a robot."
"#,
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config.friends.len(), 2);
    assert_eq!(config.friends[0].personality.as_deref(), Some("funny"));
    assert_eq!(config.friends[1].prompt.as_deref(), Some("You are a robot."));
}

#[test]
fn test_parse_error_names_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("broken.toml");
    std::fs::write(&config_path, "default_provider = [").expect("write config");

    let err = Config::load_from_path(&config_path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_add_friend_replaces_same_name() {
    let mut config = Config::default();
    config.add_friend(FriendConfig {
        name: "Alex".to_string(),
        personality: Some("funny".to_string()),
        prompt: None,
    });
    config.add_friend(FriendConfig {
        name: "Alex".to_string(),
        personality: Some("wise".to_string()),
        prompt: None,
    });

    assert_eq!(config.friends.len(), 1);
    assert_eq!(config.friends[0].personality.as_deref(), Some("wise"));
}

#[test]
fn test_defaults_fill_unset_values() {
    let config = Config::default();

    assert_eq!(config.preferred_provider(), None);
    assert_eq!(config.main_personality(), MainPersonality::default());
    assert_eq!(
        config.request_timeout(),
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
    assert_eq!(config.server_host(), "127.0.0.1");
    assert_eq!(config.server_port(), DEFAULT_SERVER_PORT);
    assert_eq!(
        config.session_idle_timeout(),
        Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60)
    );
    assert_eq!(config.max_sessions(), DEFAULT_MAX_SESSIONS);

    let claude = config.model_plan(ProviderKind::Claude);
    assert_eq!(claude.preferred, anthropic::DEFAULT_MODEL);
    assert_eq!(claude.fallbacks.len(), anthropic::DEFAULT_FALLBACK_MODELS.len());

    let chatgpt = config.model_plan(ProviderKind::ChatGpt);
    assert_eq!(chatgpt.preferred, openai::DEFAULT_MODEL);
    assert!(chatgpt.fallbacks.is_empty());
}

#[test]
fn test_configured_values_override_defaults() {
    let config = Config {
        default_provider: Some("GPT".to_string()),
        default_personality: Some("kid-friendly".to_string()),
        openai_model: Some("gpt-4o".to_string()),
        claude_fallback_models: Some(Vec::new()),
        request_timeout_secs: Some(5),
        session_idle_minutes: Some(2),
        max_sessions: Some(0),
        ..Default::default()
    };

    assert_eq!(config.preferred_provider(), Some(ProviderKind::ChatGpt));
    assert_eq!(
        config.main_personality(),
        MainPersonality::Named(Personality::KidFriendly)
    );
    assert_eq!(config.model_plan(ProviderKind::ChatGpt).preferred, "gpt-4o");
    assert!(config.model_plan(ProviderKind::Claude).fallbacks.is_empty());
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.session_idle_timeout(), Duration::from_secs(120));
    // zero means unset
    assert_eq!(config.max_sessions(), DEFAULT_MAX_SESSIONS);
}

#[test]
fn test_blank_model_uses_default() {
    let config = Config {
        claude_model: Some("  ".to_string()),
        ..Default::default()
    };
    assert_eq!(
        config.model_plan(ProviderKind::Claude).preferred,
        anthropic::DEFAULT_MODEL
    );
}
