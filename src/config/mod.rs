//! Configuration, built once at startup and passed down.
//!
//! Resolution order: CLI flags > environment (including `.env`) > defaults.

use std::fmt;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{BotError, Result};
use crate::prompts::SYSTEM_PROMPT;
use crate::provider::openai::DEFAULT_BASE_URL;
use crate::types::GenerationSettings;
use crate::util::retry::RetryPolicy;

pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";
pub const MODEL_ENV: &str = "DEEPSEEK_MODEL";
pub const USER_ENV: &str = "USER";

pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the driver and session need to know about the environment.
#[derive(Clone)]
pub struct BotConfig {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub max_tool_rounds: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub system_prompt: String,
    pub user_name: String,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("provider_name", &self.provider_name)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("request_timeout", &self.request_timeout)
            .field("user_name", &self.user_name)
            .finish()
    }
}

impl BotConfig {
    /// Defaults around an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            provider_name: "deepseek".to_string(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_name: "there".to_string(),
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_ENV).ok_or_else(|| {
            BotError::Configuration(format!("Please set your {API_KEY_ENV} in the .env file"))
        })?;

        let mut config = Self::new(api_key);
        if let Some(url) = non_empty(BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            config.model = model;
        }
        if let Some(user) = non_empty(USER_ENV) {
            config.user_name = user;
        }
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref model) = cli.model {
            self.model = model.clone();
        }
        if let Some(ref url) = cli.base_url {
            self.base_url = url.clone();
        }
        if let Some(t) = cli.temperature {
            self.temperature = t;
        }
        if let Some(max) = cli.max_tokens {
            self.max_tokens = Some(max);
        }
        if let Some(rounds) = cli.max_tool_rounds {
            self.max_tool_rounds = rounds;
        }
        if let Some(secs) = cli.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ref prompt) = cli.system_prompt {
            self.system_prompt = prompt.clone();
        }
        if let Some(ref user) = cli.user {
            self.user_name = user.clone();
        }
    }

    /// Reject settings the remote API or the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(BotError::Configuration(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tool_rounds == 0 {
            return Err(BotError::Configuration(
                "max tool rounds must be at least 1".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(BotError::Configuration("timeout must be non-zero".into()));
        }
        if self.model.trim().is_empty() {
            return Err(BotError::Configuration("model must not be empty".into()));
        }
        Ok(())
    }

    /// Settings sent with every completion request.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let err = BotConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, BotError::Configuration(ref m) if m.contains(API_KEY_ENV)));

        let err = BotConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, BotError::Configuration(_)));
    }

    #[test]
    fn defaults_apply_with_only_api_key() {
        let config = BotConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "sk-1")])).unwrap();
        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tool_rounds, DEFAULT_MAX_TOOL_ROUNDS);
        assert_eq!(config.system_prompt, SYSTEM_PROMPT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_values_override_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "sk-1"),
            (BASE_URL_ENV, "http://localhost:9000"),
            (MODEL_ENV, "deepseek-reasoner"),
            (USER_ENV, "pat"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.user_name, "pat");
    }

    #[test]
    fn cli_overrides_env() {
        let mut config = BotConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "sk-1"),
            (MODEL_ENV, "from-env"),
        ]))
        .unwrap();
        let cli = Cli {
            model: Some("from-cli".into()),
            temperature: Some(0.1),
            max_tool_rounds: Some(2),
            timeout_secs: Some(5),
            ..Default::default()
        };
        config.apply_cli(&cli);
        assert_eq!(config.model, "from-cli");
        assert_eq!(config.max_tool_rounds, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.generation_settings().temperature, Some(0.1));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = BotConfig::new("sk");
        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = BotConfig::new("sk");
        config.max_tool_rounds = 0;
        assert!(config.validate().is_err());

        let mut config = BotConfig::new("sk");
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", BotConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
