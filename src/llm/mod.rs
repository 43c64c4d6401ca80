//! LLM client abstraction.
//!
//! Provides a unified interface over hosted models that support tool
//! ("function") calling. A [`ChatModel`] receives one utterance, a system
//! instruction and the declared tools, and answers with free text, tool
//! calls, or both.

mod anthropic;
mod gemini;
mod openai;
pub mod system_prompt;
mod tools;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use system_prompt::{ASSISTANT_PERSONA, build_system_instruction};
pub use tools::{ParamType, SchemaDialect, ToolDeclaration, ToolParameter, assistant_tools};

use crate::models::ActionRequest;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Trait for hosted chat models with tool calling.
pub trait ChatModel: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Sends one request to the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached, rejects the request,
    /// or answers with something that cannot be decoded.
    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse>;
}

impl<M: ChatModel + ?Sized> ChatModel for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        (**self).generate(request)
    }
}

impl<M: ChatModel + ?Sized> ChatModel for Arc<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        (**self).generate(request)
    }
}

/// One request to a chat model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Behavioural instruction including the context summary.
    pub system_instruction: String,
    /// What the user said.
    pub utterance: String,
    /// Tools the model may call.
    pub tools: Vec<ToolDeclaration>,
}

/// What a chat model answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    /// Free-text answer, if any.
    pub text: Option<String>,
    /// Tool calls in the order the model issued them.
    pub tool_calls: Vec<ActionRequest>,
}

impl ModelResponse {
    /// Creates a text-only response.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Creates a response consisting of tool calls.
    #[must_use]
    pub const fn tool_calls(calls: Vec<ActionRequest>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }

    /// Returns the text if it contains anything besides whitespace.
    #[must_use]
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl LlmHttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub fn from_config(config: &crate::config::LlmConfig) -> Self {
        let mut settings = Self::default();
        if let Some(timeout_ms) = config.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = config.connect_timeout_ms {
            settings.connect_timeout_ms = connect_timeout_ms;
        }
        settings
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(timeout_ms) = env_u64("AIVENO_LLM_TIMEOUT_MS") {
            self.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = env_u64("AIVENO_LLM_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Maps a transport-level failure to an error, logging its kind.
fn transport_error(provider: &'static str, model: &str, e: &reqwest::Error) -> Error {
    let error_kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };
    tracing::error!(
        provider,
        model,
        error = %e,
        error_kind,
        "LLM request failed"
    );
    Error::OperationFailed {
        operation: format!("{provider}_request"),
        cause: format!("{error_kind} error: {e}"),
    }
}

/// Converts a non-success HTTP response into an error.
fn status_error(
    provider: &'static str,
    model: &str,
    response: reqwest::blocking::Response,
) -> Error {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    tracing::error!(
        provider,
        model,
        status = %status,
        body = %body,
        "LLM API returned error status"
    );
    Error::OperationFailed {
        operation: format!("{provider}_request"),
        cause: format!("API returned status: {status} - {body}"),
    }
}

/// Decodes a JSON response body.
fn decode_response<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    model: &str,
    response: reqwest::blocking::Response,
) -> Result<T> {
    response.json().map_err(|e| {
        tracing::error!(provider, model, error = %e, "Failed to parse LLM response");
        Error::OperationFailed {
            operation: format!("{provider}_response"),
            cause: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = LlmHttpConfig::default();
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.connect_timeout_ms, 3_000);
    }

    #[test]
    fn test_http_config_from_config() {
        let llm = crate::config::LlmConfig {
            timeout_ms: Some(5_000),
            ..Default::default()
        };
        let config = LlmHttpConfig::from_config(&llm);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.connect_timeout_ms, 3_000);
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(ModelResponse::text("hi").non_empty_text(), Some("hi"));
        assert_eq!(ModelResponse::text("  \n").non_empty_text(), None);
        assert_eq!(ModelResponse::default().non_empty_text(), None);
    }

    #[test]
    fn test_build_http_client_without_timeouts() {
        let _client = build_http_client(LlmHttpConfig {
            timeout_ms: 0,
            connect_timeout_ms: 0,
        });
    }
}
