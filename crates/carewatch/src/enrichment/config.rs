//! Enrichment endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible endpoint root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the message-generation endpoint.
///
/// Enrichment is available only when `enabled` is set and an API key is
/// present; in every other case the deterministic templates are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Bearer token for the endpoint; never logged or echoed
    pub api_key: String,
    /// Endpoint root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Master switch for enrichment
    pub enabled: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            enabled: false,
        }
    }
}

impl EnrichmentConfig {
    /// Read configuration from `CAREWATCH_API_KEY`, `CAREWATCH_BASE_URL`
    /// and `CAREWATCH_MODEL`. Enrichment is enabled when a key is set.
    pub fn from_env() -> Self {
        let api_key = std::env::var("CAREWATCH_API_KEY").unwrap_or_default();
        let enabled = !api_key.is_empty();

        if !enabled {
            tracing::warn!("CAREWATCH_API_KEY not set, enrichment disabled");
        }

        Self {
            api_key,
            base_url: std::env::var("CAREWATCH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("CAREWATCH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            enabled,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the endpoint root (trailing slashes are trimmed)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Toggle enrichment
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether enrichment calls can be issued at all
    pub fn is_available(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnrichmentConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.enabled);
        assert!(!config.is_available());
    }

    #[test]
    fn test_available_requires_key_and_flag() {
        let config = EnrichmentConfig::default().with_enabled(true);
        assert!(!config.is_available());

        let config = config.with_api_key("sk-test");
        assert!(config.is_available());

        let config = config.with_enabled(false);
        assert!(!config.is_available());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = EnrichmentConfig::default().with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }
}
