//! Chat-completion endpoint client.
//!
//! One HTTPS request/response per user action against an OpenAI-compatible
//! `/chat/completions` endpoint. There is no retry or timeout layer here:
//! a failed or slow call surfaces to the caller, which decides whether to
//! ask the user to try again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;

// ============================================================================
// Messages and request profiles
// ============================================================================

/// A single role-tagged message block in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for one class of call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestProfile {
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_tokens: u32,
}

/// Schema-constrained plan generation: bounded sampling, room for the
/// full JSON object.
pub const PLAN_GENERATION: RequestProfile = RequestProfile {
    temperature: 0.7,
    top_p: Some(0.9),
    max_tokens: 800,
};

/// Activity suggestions: short list output on a smaller token budget.
pub const ACTIVITY_SUGGESTION: RequestProfile = RequestProfile {
    temperature: 0.8,
    top_p: None,
    max_tokens: 300,
};

/// Plan enhancement: free-text rework of an existing plan.
pub const PLAN_ENHANCEMENT: RequestProfile = RequestProfile {
    temperature: 0.7,
    top_p: None,
    max_tokens: 800,
};

// ============================================================================
// Error type
// ============================================================================

/// Errors from completion-endpoint calls.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("No API key configured. Set openaiApiKey in config.json or the OPENAI_API_KEY environment variable")]
    MissingApiKey,
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Completion returned no text")]
    EmptyResponse,
}

// ============================================================================
// Provider trait
// ============================================================================

/// The completion collaborator, behind a trait so tests (and alternative
/// backends) can substitute their own implementation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one ordered message list and return the completion text.
    ///
    /// A response carrying no text is an [`CompletionError::EmptyResponse`];
    /// callers choose whether that is fatal or a degraded result.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        profile: RequestProfile,
    ) -> Result<String, CompletionError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for an OpenAI-compatible completion endpoint.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client from config. Construction always succeeds; a missing
    /// credential is reported on first use, not here.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        profile: RequestProfile,
    ) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: profile.temperature,
            top_p: profile.top_p,
            max_tokens: profile.max_tokens,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            log::warn!("completion call failed with status {}", status);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = resp.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }
}
