//! Client and request configuration

use serde_json::{Map, Value};
use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{LlmError, Result};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenRouter's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MAX_TOKENS: u32 = 4096;

pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Environment variables checked for the API key, in order
pub const API_KEY_VARS: [&str; 3] = ["LLMWRAP_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"];

/// Extra transport options handed to the underlying HTTP client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    pub org_id: Option<String>,
    pub project_id: Option<String>,
    /// Whole-request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
    /// Headers sent with every request, e.g. OpenRouter's `HTTP-Referer` and `X-Title`
    pub headers: Vec<(String, String)>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the organization id
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Set the project id
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True when nothing beyond the upstream defaults was requested
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

/// Configuration the wrapper is constructed with
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub options: ClientOptions,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

impl LlmConfig {
    /// Create a config with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            options: ClientOptions::default(),
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the transport options
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a config from `LLMWRAP_*` environment variables
    ///
    /// The API key is taken from the first non-empty variable in [`API_KEY_VARS`].
    /// `LLMWRAP_MODEL`, `LLMWRAP_BASE_URL` and `LLMWRAP_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`LlmConfig::from_env`], reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = API_KEY_VARS
            .into_iter()
            .find_map(|name| var(name))
            .ok_or_else(|| {
                LlmError::Config(format!("no API key set (tried {})", API_KEY_VARS.join(", ")))
            })?;

        let mut config = Self::new(api_key);
        if let Some(model) = var("LLMWRAP_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = var("LLMWRAP_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(raw) = var("LLMWRAP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                LlmError::Config(format!("LLMWRAP_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config.options.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Per-call generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Additional request body fields such as `top_p` or `stop`
    pub extra: Map<String, Value>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            extra: Map::new(),
        }
    }
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Add an extra request body field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::new("sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert!(config.options.is_default());
    }

    #[test]
    fn test_llm_config_builder() {
        let config = LlmConfig::new("sk-test")
            .with_model("anthropic/claude-3.5-sonnet")
            .with_base_url("http://localhost:8000/v1")
            .with_options(ClientOptions::new().with_header("X-Title", "llmwrap"));

        assert_eq!(config.model, "anthropic/claude-3.5-sonnet");
        assert_eq!(config.base_url, "http://localhost:8000/v1");
        assert_eq!(
            config.options.headers,
            vec![("X-Title".to_string(), "llmwrap".to_string())]
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", LlmConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_lookup_key_precedence() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("OPENROUTER_API_KEY", "sk-router"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "sk-router");

        let config = LlmConfig::from_lookup(lookup_from(&[
            ("LLMWRAP_API_KEY", "sk-own"),
            ("OPENROUTER_API_KEY", "sk-router"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "sk-own");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("LLMWRAP_API_KEY", "sk-own"),
            ("LLMWRAP_MODEL", "openai/gpt-4o"),
            ("LLMWRAP_BASE_URL", "http://localhost:8000/v1"),
            ("LLMWRAP_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.base_url, "http://localhost:8000/v1");
        assert_eq!(config.options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_lookup_missing_key() {
        let err = LlmConfig::from_lookup(lookup_from(&[("LLMWRAP_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = LlmConfig::from_lookup(lookup_from(&[
            ("LLMWRAP_API_KEY", "sk-own"),
            ("LLMWRAP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_completion_options() {
        let options = CompletionOptions::default();
        assert_eq!(options.max_tokens, 4096);
        assert_eq!(options.temperature, 0.1);
        assert!(options.extra.is_empty());

        let options = CompletionOptions::new()
            .with_max_tokens(256)
            .with_temperature(0.7)
            .with_extra("top_p", 0.9);
        assert_eq!(options.max_tokens, 256);
        assert_eq!(options.extra.get("top_p"), Some(&Value::from(0.9)));
    }
}
