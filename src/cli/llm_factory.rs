//! Chat model construction from [`LlmConfig`].

use crate::config::{LlmConfig, LlmProvider};
use crate::llm::{AnthropicClient, ChatModel, GeminiClient, LlmHttpConfig, OpenAiClient};

/// Builds HTTP configuration from LLM config with environment overrides.
#[must_use]
pub fn build_http_config(llm_config: &LlmConfig) -> LlmHttpConfig {
    LlmHttpConfig::from_config(llm_config).with_env_overrides()
}

/// Client builder methods shared by every hosted provider.
trait ConfiguredClient: Sized {
    fn with_api_key(self, key: impl Into<String>) -> Self;
    fn with_model(self, model: impl Into<String>) -> Self;
    fn with_endpoint(self, endpoint: impl Into<String>) -> Self;
    fn with_http_config(self, config: LlmHttpConfig) -> Self;

    /// Applies whatever the config overrides, leaving provider defaults
    /// in place for the rest.
    fn configured(self, llm_config: &LlmConfig) -> Self {
        let mut client = self;
        if let Some(api_key) = llm_config.api_key.as_deref() {
            client = client.with_api_key(api_key);
        }
        if let Some(model) = llm_config.model.as_deref() {
            client = client.with_model(model);
        }
        if let Some(base_url) = llm_config.base_url.as_deref() {
            client = client.with_endpoint(base_url);
        }
        client.with_http_config(build_http_config(llm_config))
    }
}

macro_rules! configured_client {
    ($($client:ty),+) => {
        $(impl ConfiguredClient for $client {
            fn with_api_key(self, key: impl Into<String>) -> Self {
                <$client>::with_api_key(self, key)
            }
            fn with_model(self, model: impl Into<String>) -> Self {
                <$client>::with_model(self, model)
            }
            fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
                <$client>::with_endpoint(self, endpoint)
            }
            fn with_http_config(self, config: LlmHttpConfig) -> Self {
                <$client>::with_http_config(self, config)
            }
        })+
    };
}

configured_client!(GeminiClient, OpenAiClient, AnthropicClient);

/// Builds a Gemini client from configuration.
#[must_use]
pub fn build_gemini_client(llm_config: &LlmConfig) -> GeminiClient {
    GeminiClient::new().configured(llm_config)
}

/// Builds an `OpenAI` client from configuration.
#[must_use]
pub fn build_openai_client(llm_config: &LlmConfig) -> OpenAiClient {
    OpenAiClient::new().configured(llm_config)
}

/// Builds an Anthropic client from configuration.
#[must_use]
pub fn build_anthropic_client(llm_config: &LlmConfig) -> AnthropicClient {
    AnthropicClient::new().configured(llm_config)
}

/// Builds the configured chat model.
#[must_use]
pub fn build_chat_model(llm_config: &LlmConfig) -> Box<dyn ChatModel> {
    tracing::debug!(
        provider = llm_config.provider.as_str(),
        model = llm_config.model.as_deref().unwrap_or("(default)"),
        "Building chat model"
    );
    match llm_config.provider {
        LlmProvider::Gemini => Box::new(build_gemini_client(llm_config)),
        LlmProvider::OpenAi => Box::new(build_openai_client(llm_config)),
        LlmProvider::Anthropic => Box::new(build_anthropic_client(llm_config)),
    }
}
