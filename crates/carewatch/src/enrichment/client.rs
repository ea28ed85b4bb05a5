//! HTTP client for the message-generation endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{CareError, Result};

use super::config::EnrichmentConfig;
use super::context::{parse_generated, GeneratedMessages, MessageContext, SYSTEM_PROMPT};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const ERROR_BODY_CAP: usize = 200;
const TEMPERATURE: f32 = 0.6;
const MAX_TOKENS: u32 = 300;

/// Anything that can turn a message context into generated messages.
///
/// Implemented by [`LlmClient`] for the real endpoint; tests substitute
/// scripted generators.
#[async_trait::async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Generate messages for one decision context
    async fn generate(&self, ctx: &MessageContext) -> Result<GeneratedMessages>;
}

/// One chat message on the wire
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Message role ("system" or "user")
    pub role: String,
    /// Message content
    pub content: String,
}

/// Chat-completions request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// System + user messages
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct LlmClient {
    client: Client,
    config: EnrichmentConfig,
}

impl LlmClient {
    /// Create a client for the given configuration.
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("carewatch/0.1")
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Access the configuration
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Check whether the endpoint is reachable.
    ///
    /// Reporting only; a failed probe changes no engine state.
    pub async fn probe(&self) -> bool {
        let url = format!("{}/models", self.config.base_url);
        self.client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn request_body(&self, ctx: &MessageContext) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: ctx.user_prompt(),
                },
            ],
        }
    }
}

#[async_trait::async_trait]
impl MessageGenerator for LlmClient {
    async fn generate(&self, ctx: &MessageContext) -> Result<GeneratedMessages> {
        if !self.config.is_available() {
            return Err(CareError::Config(
                "enrichment is disabled or the API key is missing".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.config.base_url);
        let body = self.request_body(ctx);

        tracing::debug!(model = %self.config.model, level = ctx.level.level(), "issuing enrichment call");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_CAP).collect();
            return Err(CareError::Enrichment {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        Ok(parse_generated(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentState, InterventionLevel, RiskScores};

    fn test_context() -> MessageContext {
        MessageContext::new(
            InterventionLevel::StaffSoftAlert,
            &RiskScores::from_components(75.0, 40.0, 30.0),
            &[],
            &CurrentState::default(),
            false,
        )
    }

    #[test]
    fn test_request_body_shape() {
        let client = LlmClient::new(
            EnrichmentConfig::default()
                .with_api_key("sk-test")
                .with_enabled(true),
        );
        let body = client.request_body(&test_context());

        assert_eq!(body.temperature, 0.6);
        assert_eq!(body.max_tokens, 300);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].role, "user");

        let json = serde_json::to_value(&body).expect("serializes");
        assert!(json.get("model").is_some());
        assert!(json.get("messages").is_some());
    }

    #[tokio::test]
    async fn test_generate_requires_availability() {
        let client = LlmClient::new(EnrichmentConfig::default());
        let result = client.generate(&test_context()).await;
        assert!(matches!(result, Err(CareError::Config(_))));
    }
}
