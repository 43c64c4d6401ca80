//! `OpenAI` client.

use super::{
    ChatModel, LlmHttpConfig, ModelRequest, ModelResponse, SchemaDialect, build_http_client,
    decode_response, status_error, transport_error,
};
use crate::models::ActionRequest;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `OpenAI` chat completions client with tool calling.
pub struct OpenAiClient {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    /// Creates a new `OpenAI` client.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
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

    /// Checks if the model is a reasoning-family model.
    ///
    /// These use `max_completion_tokens` instead of `max_tokens` and only
    /// support the default temperature.
    fn is_reasoning_model(&self) -> bool {
        self.model.starts_with("gpt-5")
            || self.model.starts_with("o1")
            || self.model.starts_with("o3")
    }

    fn build_request(&self, request: &ModelRequest) -> ChatCompletionRequest {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: request.system_instruction.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.utterance.clone(),
            },
        ];
        let tools = request
            .tools
            .iter()
            .map(|tool| ToolSpec {
                kind: "function".to_string(),
                function: FunctionSpec {
                    name: tool.name.to_string(),
                    description: tool.description.to_string(),
                    parameters: tool.parameters_schema(SchemaDialect::JsonSchema),
                },
            })
            .collect();

        let reasoning = self.is_reasoning_model();
        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            max_tokens: (!reasoning).then_some(1024),
            max_completion_tokens: reasoning.then_some(1024),
            temperature: (!reasoning).then_some(0.7),
        }
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatModel for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::OperationFailed {
                operation: "openai_request".to_string(),
                cause: "OPENAI_API_KEY not set".to_string(),
            })?;

        tracing::info!(provider = "openai", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&self.build_request(request))
            .send()
            .map_err(|e| transport_error("openai", &self.model, &e))?;

        if !response.status().is_success() {
            return Err(status_error("openai", &self.model, response));
        }

        let response: ChatCompletionResponse = decode_response("openai", &self.model, response)?;
        response.into_model_response()
    }
}

/// Request to the chat completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    kind: String,
    function: FunctionSpec,
}

#[derive(Debug, Serialize)]
struct FunctionSpec {
    name: String,
    description: String,
    parameters: Value,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolCallFunction,
}

#[derive(Debug, Deserialize)]
struct ToolCallFunction {
    name: String,
    /// JSON-encoded argument object.
    #[serde(default)]
    arguments: String,
}

impl ChatCompletionResponse {
    fn into_model_response(self) -> Result<ModelResponse> {
        let message = self
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::OperationFailed {
                operation: "openai_response".to_string(),
                cause: "No choices in response".to_string(),
            })?;

        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(|call| {
                let args = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    tracing::warn!(
                        tool = %call.function.name,
                        error = %e,
                        "Tool call arguments are not valid JSON"
                    );
                    Value::Null
                });
                ActionRequest::new(call.function.name, args)
            })
            .collect();

        Ok(ModelResponse {
            text: message.content,
            tool_calls,
        })
    }
}
