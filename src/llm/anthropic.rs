//! Anthropic Claude client.

use super::{
    ChatModel, LlmHttpConfig, ModelRequest, ModelResponse, SchemaDialect, build_http_client,
    decode_response, status_error, transport_error,
};
use crate::models::ActionRequest;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anthropic Messages API client with tool use.
pub struct AnthropicClient {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl AnthropicClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.anthropic.com/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-latest";

    /// Creates a new Anthropic client.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            client: build_http_client(LlmHttpConfig::from_env()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets HTTP client timeouts for LLM requests.
    #[must_use]
    pub fn with_http_config(mut self, config: LlmHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Validates the configured key and returns it.
    fn validated_key(&self) -> Result<&str> {
        let key = self
            .api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| Error::OperationFailed {
                operation: "anthropic_request".to_string(),
                cause: "ANTHROPIC_API_KEY not set".to_string(),
            })?;

        if !Self::is_valid_api_key_format(key) {
            return Err(Error::OperationFailed {
                operation: "anthropic_request".to_string(),
                cause: "Invalid API key format: expected 'sk-ant-' prefix".to_string(),
            });
        }

        Ok(key)
    }

    /// Checks if an API key has a plausible format.
    ///
    /// Valid keys start with `sk-ant-`, are at least 40 characters, and
    /// contain only alphanumerics, hyphens, and underscores.
    fn is_valid_api_key_format(key: &str) -> bool {
        const MIN_KEY_LENGTH: usize = 40;
        const PREFIX: &str = "sk-ant-";

        if !key.starts_with(PREFIX) || key.len() < MIN_KEY_LENGTH {
            return false;
        }

        key.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn build_request(&self, request: &ModelRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            system: request.system_instruction.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.utterance.clone(),
            }],
            tools: request
                .tools
                .iter()
                .map(|tool| ToolSpec {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    input_schema: tool.parameters_schema(SchemaDialect::JsonSchema),
                })
                .collect(),
        }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatModel for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let api_key = self.validated_key()?;

        tracing::info!(provider = "anthropic", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(format!("{}/messages", self.endpoint))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.build_request(request))
            .send()
            .map_err(|e| transport_error("anthropic", &self.model, &e))?;

        if !response.status().is_success() {
            return Err(status_error("anthropic", &self.model, response));
        }

        let response: MessagesResponse = decode_response("anthropic", &self.model, response)?;
        Ok(response.into_model_response())
    }
}

/// Request to the Messages API.
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec>,
}

/// A message in the conversation.
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    name: String,
    description: String,
    input_schema: Value,
}

/// Response from the Messages API.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// A content block in the response.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    fn into_model_response(self) -> ModelResponse {
        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in self.content {
            match block {
                ContentBlock::Text { text: t } => text.push_str(&t),
                ContentBlock::ToolUse { name, input } => {
                    tool_calls.push(ActionRequest::new(name, input));
                },
                ContentBlock::Other => {},
            }
        }
        ModelResponse {
            text: (!text.is_empty()).then_some(text),
            tool_calls,
        }
    }
}
