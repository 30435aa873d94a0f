//! Language Model Completion Client
//!
//! The agents only need single-turn request/response semantics from the
//! model: send the whole conversation, get one text reply back. This module
//! defines that seam ([`CompletionClient`]) and an OpenAI-compatible HTTP
//! implementation of it.
//!
//! Requests are never retried: a failure surfaces as an [`LlmError`] and the
//! caller decides what to do with it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::contracts::{ChatMessage, Conversation};

/// Default OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default completion token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Completion client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API root, always ending in `/`
    pub base_url: Url,

    /// Bearer token
    pub api_key: Option<String>,

    /// Model used when an agent does not override it
    pub model: String,

    /// Completion token limit
    pub max_tokens: u32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Valid default URL"),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    /// Create config from environment variables.
    ///
    /// - `OPENAI_API_KEY`: bearer token (optional for local servers)
    /// - `OPENAI_BASE_URL`: API root
    /// - `MODEL_NAME`: default model
    /// - `MAX_TOKENS`: completion token limit
    /// - `LLM_TIMEOUT_SECS`: request timeout
    pub fn from_env() -> Result<Self, LlmError> {
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let model = std::env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_tokens = std::env::var("MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            api_key,
            model,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Replace the API root.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, LlmError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }
}

/// Parse an API root, appending the trailing slash `Url::join` relies on.
fn parse_base_url(raw: &str) -> Result<Url, LlmError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| LlmError::Configuration(e.to_string()))
}

/// Errors from completion requests.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Response error: status={status}, message={message}")]
    Response { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Connection(err.to_string())
        } else if err.is_decode() {
            LlmError::MalformedResponse(err.to_string())
        } else {
            LlmError::Request(err.to_string())
        }
    }
}

/// Per-agent model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token limit
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Settings using the configured model with an agent-specific temperature.
    pub fn from_config(config: &LlmConfig, temperature: f32) -> Self {
        Self {
            model: config.model.clone(),
            temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default(), 0.2)
    }
}

/// A language model that answers a conversation with one reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full conversation and return the assistant's reply text.
    async fn complete(
        &self,
        settings: &ModelSettings,
        conversation: &Conversation,
    ) -> Result<String, LlmError>;
}

#[async_trait]
impl<C: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<C> {
    async fn complete(
        &self,
        settings: &ModelSettings,
        conversation: &Conversation,
    ) -> Result<String, LlmError> {
        (**self).complete(settings, conversation).await
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat-completions response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Error body returned by OpenAI-compatible servers.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for OpenAI-compatible chat-completions endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Create a new client.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::new(config)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build a URL for an API endpoint.
    fn build_url(&self, path: &str) -> Result<Url, LlmError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| LlmError::Configuration(e.to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, conversation), fields(model = %settings.model, turns = conversation.turns()))]
    async fn complete(
        &self,
        settings: &ModelSettings,
        conversation: &Conversation,
    ) -> Result<String, LlmError> {
        let url = self.build_url("chat/completions")?;

        let body = ChatCompletionRequest {
            model: &settings.model,
            messages: conversation.messages(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        };

        let request = self.client.post(url).json(&body);
        let request = if let Some(ref token) = self.config.api_key {
            request.bearer_auth(token)
        } else {
            request
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);

            warn!(status = status.as_u16(), "Completion request rejected");

            return match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(LlmError::Authentication(message))
                }
                _ => Err(LlmError::Response {
                    status: status.as_u16(),
                    message,
                }),
            };
        }

        let text = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("Response has no message content".to_string()))?;

        debug!(chars = content.len(), "Completion received");

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenAiClient {
        let config = LlmConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        }
        .with_base_url(&server.uri())
        .unwrap();
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_build_url_without_trailing_slash() {
        let config = LlmConfig::default()
            .with_base_url("http://example.com/v1")
            .unwrap();
        let client = OpenAiClient::new(config).unwrap();

        let url = client.build_url("chat/completions").unwrap();
        assert_eq!(url.as_str(), "http://example.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_sends_conversation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("secret"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "You review."},
                    {"role": "user", "content": "Review this"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "A plausible idea."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let mut conversation = Conversation::new("You review.");
        conversation.push_user("Review this");

        let reply = client
            .complete(&ModelSettings::default(), &conversation)
            .await
            .unwrap();
        assert_eq!(reply, "A plausible idea.");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("bad"));
        let result = client
            .complete(&ModelSettings::default(), &Conversation::new("sys"))
            .await;

        match result {
            Err(LlmError::Authentication(message)) => {
                assert_eq!(message, "Incorrect API key provided")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let result = client
            .complete(&ModelSettings::default(), &Conversation::new("sys"))
            .await;

        assert!(matches!(result, Err(LlmError::Response { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let result = client
            .complete(&ModelSettings::default(), &Conversation::new("sys"))
            .await;

        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }
}
