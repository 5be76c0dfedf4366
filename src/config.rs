//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::llm::RetryPolicy;

/// Default Mistral chat-completions endpoint.
pub const DEFAULT_MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";

/// Default Mistral model.
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";

/// Default OpenFDA drug label endpoint.
pub const DEFAULT_OPENFDA_API_URL: &str = "https://api.fda.gov/drug/label.json";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cached chat responses
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Bearer key for the Mistral API
    pub mistral_api_key: String,
    pub mistral_api_url: String,
    pub mistral_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Maximum LLM attempts per chat request
    pub llm_max_attempts: u32,
    /// Overall deadline in seconds shared by all LLM attempts
    pub llm_timeout: u64,
    pub openfda_api_url: String,
    /// Supabase project URL, required unless `auth_disabled` is set
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    /// Explicit opt-in to run without authentication and history
    pub auth_disabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL` - Cached response lifetime in seconds (default: 1800)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 600)
    /// - `MISTRAL_API_KEY` - Mistral API key (default: empty)
    /// - `MISTRAL_API_URL` / `MISTRAL_MODEL` - Endpoint and model
    /// - `LLM_TEMPERATURE` (default: 0.7) / `LLM_MAX_TOKENS` (default: 1000)
    /// - `LLM_MAX_ATTEMPTS` (default: 3) / `LLM_TIMEOUT` in seconds (default: 30)
    /// - `OPENFDA_API_URL` - Drug label endpoint
    /// - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - Persistence backend
    /// - `AUTH_DISABLED` - `true` to run without Supabase (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            cache_ttl: parse_env("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: parse_env("CACHE_CLEANUP_INTERVAL", defaults.cleanup_interval),
            mistral_api_key: env::var("MISTRAL_API_KEY").unwrap_or(defaults.mistral_api_key),
            mistral_api_url: env::var("MISTRAL_API_URL").unwrap_or(defaults.mistral_api_url),
            mistral_model: env::var("MISTRAL_MODEL").unwrap_or(defaults.mistral_model),
            temperature: parse_env("LLM_TEMPERATURE", defaults.temperature),
            max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", defaults.llm_max_attempts),
            llm_timeout: parse_env("LLM_TIMEOUT", defaults.llm_timeout),
            openfda_api_url: env::var("OPENFDA_API_URL").unwrap_or(defaults.openfda_api_url),
            supabase_url: non_empty_env("SUPABASE_URL"),
            supabase_anon_key: non_empty_env("SUPABASE_ANON_KEY"),
            auth_disabled: parse_env("AUTH_DISABLED", defaults.auth_disabled),
        }
    }

    /// Cached response lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Interval between background cache sweeps.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }

    /// Retry policy for the LLM call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.llm_max_attempts.max(1),
            overall_timeout: Duration::from_secs(self.llm_timeout),
            ..RetryPolicy::default()
        }
    }

    /// Returns the Supabase URL and key when both are configured.
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: 30 * 60,
            cleanup_interval: 10 * 60,
            mistral_api_key: String::new(),
            mistral_api_url: DEFAULT_MISTRAL_API_URL.to_string(),
            mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            llm_max_attempts: 3,
            llm_timeout: 30,
            openfda_api_url: DEFAULT_OPENFDA_API_URL.to_string(),
            supabase_url: None,
            supabase_anon_key: None,
            auth_disabled: false,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
