//! Core `ChatClient` trait and `ApiChatClient` implementation.
//!
//! `ApiChatClient` calls any OpenAI-compatible `/chat/completions` endpoint
//! — DeepSeek, OpenAI, Groq, vLLM, Ollama (OpenAI mode), etc.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a chat completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatRequest
// ---------------------------------------------------------------------------

/// One chat-completion request.
///
/// Built by the pipeline stages; each stage fixes its own temperature and
/// output mode, so the builder methods cover exactly those two knobs plus an
/// optional token bound.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction.
    pub system: String,
    /// User message content.
    pub user: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Optional completion-token bound.
    pub max_tokens: Option<u32>,
    /// Ask the provider for structured (JSON-object) output when it supports
    /// the `response_format` field.
    pub json_mode: bool,
}

impl ChatRequest {
    /// Create a request with the given system and user messages.
    ///
    /// Defaults: temperature 0.0, no token bound, plain-text output.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
            max_tokens: None,
            json_mode: false,
        }
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Bound the completion length.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request structured (JSON-object) output.
    pub fn json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// Async trait for chat-completion backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn ChatClient>`).
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Run one completion and return the raw assistant text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiChatClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// Works with: DeepSeek, OpenAI, Groq, Together.ai, vLLM, Ollama (OpenAI
/// mode) — any provider that speaks the OpenAI chat-completions wire format.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`LlmConfig`] passed to [`ApiChatClient::from_config`].
pub struct ApiChatClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiChatClient {
    /// Build an `ApiChatClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ChatClient for ApiChatClient {
    /// Send `request` to the configured OpenAI-compatible endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when the
    /// resolved API key is non-empty — safe for local providers that require
    /// no authentication.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user",   "content": request.user   }
            ],
            "stream":      false,
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if request.json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let mut req = self.client.post(&url).json(&body);

        if let Some(key) = self.config.resolve_api_key() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: "https://api.deepseek.com".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "deepseek-chat".into(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let config = make_config(None);
        let _client = ApiChatClient::from_config(&config);
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let config = make_config(Some(""));
        let _client = ApiChatClient::from_config(&config);
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let config = make_config(Some("sk-test-1234"));
        let _client = ApiChatClient::from_config(&config);
    }

    /// Verify that `ApiChatClient` is object-safe (usable as `dyn ChatClient`).
    #[test]
    fn client_is_object_safe() {
        let config = make_config(None);
        let client: Box<dyn ChatClient> = Box::new(ApiChatClient::from_config(&config));
        // Just holding the trait object is sufficient to verify object-safety.
        drop(client);
    }

    #[test]
    fn request_builder_sets_fields() {
        let request = ChatRequest::new("system", "user")
            .temperature(0.5)
            .max_tokens(512)
            .json_mode();

        assert_eq!(request.system, "system");
        assert_eq!(request.user, "user");
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_tokens, Some(512));
        assert!(request.json_mode);
    }

    #[test]
    fn request_defaults_are_deterministic_plain_text() {
        let request = ChatRequest::new("s", "u");

        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, None);
        assert!(!request.json_mode);
    }
}
