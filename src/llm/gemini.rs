//! Google Gemini client.

use super::{
    ChatModel, LlmHttpConfig, ModelRequest, ModelResponse, SchemaDialect, build_http_client,
    decode_response, status_error, transport_error,
};
use crate::models::ActionRequest;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini `generateContent` client with function calling.
pub struct GeminiClient {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Creates a new Gemini client.
    ///
    /// Reads the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
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

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| Error::OperationFailed {
                operation: "gemini_request".to_string(),
                cause: "GEMINI_API_KEY not set".to_string(),
            })
    }

    fn build_request(request: &ModelRequest) -> GenerateContentRequest {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![Tool {
                function_declarations: request
                    .tools
                    .iter()
                    .map(|tool| FunctionDeclaration {
                        name: tool.name.to_string(),
                        description: tool.description.to_string(),
                        parameters: tool.parameters_schema(SchemaDialect::Gemini),
                    })
                    .collect(),
            }]
        };

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(&request.system_instruction)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(&request.utterance)],
            }],
            tools,
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let api_key = self.api_key()?;

        tracing::info!(provider = "gemini", model = %self.model, "Making LLM request");

        let body = Self::build_request(request);
        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.endpoint, self.model
            ))
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| transport_error("gemini", &self.model, &e))?;

        if !response.status().is_success() {
            return Err(status_error("gemini", &self.model, response));
        }

        let response: GenerateContentResponse = decode_response("gemini", &self.model, response)?;
        Ok(response.into_model_response())
    }
}

/// Request to the `generateContent` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            function_call: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

/// Response from the `generateContent` endpoint.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Collects text and function calls from the first candidate.
    ///
    /// A response without candidates (for example a blocked prompt) yields
    /// an empty model response.
    fn into_model_response(self) -> ModelResponse {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in parts {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(call) = part.function_call {
                tool_calls.push(ActionRequest::new(call.name, call.args));
            }
        }

        ModelResponse {
            text: (!text.is_empty()).then_some(text),
            tool_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::assistant_tools;
    use serde_json::json;

    fn request() -> ModelRequest {
        ModelRequest {
            system_instruction: "be nice".to_string(),
            utterance: "spent 200 on lunch".to_string(),
            tools: assistant_tools(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new();
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.model, GeminiClient::DEFAULT_MODEL);
    }

    #[test]
    fn test_client_configuration() {
        let client = GeminiClient::new()
            .with_api_key("test-key")
            .with_endpoint("https://custom.endpoint")
            .with_model("gemini-2.0-flash");

        assert_eq!(
            client.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("test-key")
        );
        assert_eq!(client.endpoint, "https://custom.endpoint");
        assert_eq!(client.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let client = GeminiClient {
            api_key: None,
            endpoint: "http://127.0.0.1:9".to_string(),
            model: GeminiClient::DEFAULT_MODEL.to_string(),
            client: reqwest::blocking::Client::new(),
        };
        let err = client.generate(&request());
        assert!(matches!(err, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GeminiClient::build_request(&request()))
            .unwrap_or_default();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be nice");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "spent 200 on lunch");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][1]["name"],
            "add_expense"
        );
        assert!(body["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_parse_function_calls_in_order() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "add_reminder", "args": {"title": "Pay rent", "dueDate": "2024-05-01 10:00"}}},
                        {"functionCall": {"name": "update_memory", "args": {"fact": "User pays rent monthly"}}}
                    ]
                }
            }]
        });
        let response: GenerateContentResponse =
            serde_json::from_value(raw).unwrap_or(GenerateContentResponse { candidates: vec![] });
        let parsed = response.into_model_response();
        assert!(parsed.text.is_none());
        assert_eq!(parsed.tool_calls.len(), 2);
        assert_eq!(parsed.tool_calls[0].name, "add_reminder");
        assert_eq!(parsed.tool_calls[1].args["fact"], "User pays rent monthly");
    }

    #[test]
    fn test_parse_text_parts_are_joined() {
        let raw = json!({
            "candidates": [{"content": {"parts": [{"text": "Namaste! "}, {"text": "How can I help?"}]}}]
        });
        let response: GenerateContentResponse =
            serde_json::from_value(raw).unwrap_or(GenerateContentResponse { candidates: vec![] });
        let parsed = response.into_model_response();
        assert_eq!(parsed.text.as_deref(), Some("Namaste! How can I help?"));
        assert!(parsed.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
                .unwrap_or(GenerateContentResponse { candidates: vec![] });
        assert_eq!(response.into_model_response(), ModelResponse::default());
    }
}
