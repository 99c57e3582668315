//! Process Settings
//!
//! Read once at startup and handed to whichever component talks to the
//! language model. Nothing else in the workspace reads the environment.

use agent_core::provider::{DEFAULT_MODEL, GenerationOptions};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Language-model settings
#[derive(Clone, Debug)]
pub struct Settings {
    /// API credential; empty means every call fails with an auth error
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible API, without trailing slash
    pub base_url: String,

    /// Sampling temperature for conversational replies
    pub temperature: f32,

    /// HTTP timeout for one completion request
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    ///
    /// - `OPENAI_API_KEY` (default: empty)
    /// - `DEFAULT_MODEL` (default: `gpt-4o-mini`)
    /// - `OPENAI_BASE_URL` (default: `https://api.openai.com/v1`)
    /// - `LLM_TEMPERATURE` (default: `0.7`)
    /// - `LLM_TIMEOUT_SECS` (default: `120`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let temperature = non_empty("LLM_TEMPERATURE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.temperature);
        let request_timeout_secs = non_empty("LLM_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        Self {
            api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            model: non_empty("DEFAULT_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("OPENAI_BASE_URL")
                .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_string()),
            temperature,
            request_timeout_secs,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Generation options derived from these settings
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::default()
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
    }
}
