//! Environment-driven configuration.
//!
//! All settings arrive through `SUMMARIST_*` environment variables (a `.env`
//! file is honored via dotenvy). The loaded `Config` value is passed into
//! constructors explicitly; there is no process-global configuration cache,
//! and each provider client captures its API key once at construction.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::provider::transport::RetryPolicy;

/// Default chunk token budget when no override is configured.
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 10_000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    /// Hosted OpenAI chat-completions API.
    OpenAi,
    /// Hosted Google Gemini generateContent API.
    Gemini,
}

impl std::str::FromStr for Provider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            _ => Err(()),
        }
    }
}

/// Runtime configuration for the summarization pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which provider backend answers summarization requests.
    pub provider: Provider,
    /// Credential for the selected provider.
    pub api_key: String,
    /// Optional model identifier override; each provider has its own default.
    pub model: Option<String>,
    /// Optional base URL override for the provider endpoint.
    pub endpoint: Option<String>,
    /// Token budget per chunk request.
    pub max_chunk_tokens: usize,
    /// Optional override for the number of rate-limit retry attempts.
    pub retry_max_attempts: Option<u32>,
    /// Optional override for the wait between rate-limited attempts.
    pub retry_delay: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables, performing validation
    /// along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self {
            provider: load_env("SUMMARIST_PROVIDER")?
                .parse()
                .map_err(|()| ConfigError::InvalidValue("SUMMARIST_PROVIDER".to_string()))?,
            api_key: load_env("SUMMARIST_API_KEY")?,
            model: load_env_optional("SUMMARIST_MODEL"),
            endpoint: load_env_optional("SUMMARIST_ENDPOINT"),
            max_chunk_tokens: load_env_optional("SUMMARIST_MAX_CHUNK_TOKENS")
                .map(|value| {
                    value.parse().map_err(|_| {
                        ConfigError::InvalidValue("SUMMARIST_MAX_CHUNK_TOKENS".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_CHUNK_TOKENS),
            retry_max_attempts: load_env_optional("SUMMARIST_RETRY_MAX_ATTEMPTS")
                .map(|value| {
                    value.parse().map_err(|_| {
                        ConfigError::InvalidValue("SUMMARIST_RETRY_MAX_ATTEMPTS".to_string())
                    })
                })
                .transpose()?,
            retry_delay: load_env_optional("SUMMARIST_RETRY_DELAY_MS")
                .map(|value| {
                    value.parse().map(Duration::from_millis).map_err(|_| {
                        ConfigError::InvalidValue("SUMMARIST_RETRY_DELAY_MS".to_string())
                    })
                })
                .transpose()?,
        };
        tracing::debug!(
            provider = ?config.provider,
            model = ?config.model,
            max_chunk_tokens = config.max_chunk_tokens,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Retry policy with any configured overrides applied over the defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.retry_max_attempts.unwrap_or(defaults.max_attempts),
            delay: self.retry_delay.unwrap_or(defaults.delay),
        }
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<Provider>(), Ok(Provider::OpenAi));
        assert_eq!("GEMINI".parse::<Provider>(), Ok(Provider::Gemini));
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn retry_policy_defaults_when_unset() {
        let config = Config {
            provider: Provider::OpenAi,
            api_key: "key".to_string(),
            model: None,
            endpoint: None,
            max_chunk_tokens: DEFAULT_MAX_CHUNK_TOKENS,
            retry_max_attempts: None,
            retry_delay: None,
        };
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn retry_policy_applies_overrides() {
        let config = Config {
            provider: Provider::Gemini,
            api_key: "key".to_string(),
            model: None,
            endpoint: None,
            max_chunk_tokens: DEFAULT_MAX_CHUNK_TOKENS,
            retry_max_attempts: Some(2),
            retry_delay: Some(Duration::from_millis(5)),
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay, Duration::from_millis(5));
    }
}
