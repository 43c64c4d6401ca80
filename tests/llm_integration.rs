//! LLM client integration tests.
//!
//! Exercises provider clients against endpoints that cannot answer, checking
//! that every failure mode surfaces as an error and that the orchestrator
//! turns it into the connection-trouble reply.
//!
//! These tests do NOT require actual API keys.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use aiveno::cli::build_chat_model;
use aiveno::config::{LlmConfig, LlmProvider};
use aiveno::llm::{
    AnthropicClient, GeminiClient, LlmHttpConfig, ModelRequest, OpenAiClient, assistant_tools,
};
use aiveno::services::FAILURE_REPLY;
use aiveno::{AppState, ChatModel, Error, Orchestrator, TurnOutcome};
use test_case::test_case;

/// Nothing listens on the discard port.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

fn fast_fail() -> LlmHttpConfig {
    LlmHttpConfig {
        timeout_ms: 2_000,
        connect_timeout_ms: 500,
    }
}

fn request() -> ModelRequest {
    ModelRequest {
        system_instruction: "You are Aiveno.".to_string(),
        utterance: "Remind me to call mom".to_string(),
        tools: assistant_tools(),
    }
}

fn unreachable_clients() -> Vec<Box<dyn ChatModel>> {
    vec![
        Box::new(
            GeminiClient::new()
                .with_api_key("test-gemini-key")
                .with_endpoint(DEAD_ENDPOINT)
                .with_http_config(fast_fail()),
        ),
        Box::new(
            OpenAiClient::new()
                .with_api_key("sk-proj-test-key-for-testing-only1234567890")
                .with_endpoint(DEAD_ENDPOINT)
                .with_http_config(fast_fail()),
        ),
        Box::new(
            AnthropicClient::new()
                .with_api_key("sk-ant-REDACTED")
                .with_endpoint(DEAD_ENDPOINT)
                .with_http_config(fast_fail()),
        ),
    ]
}

#[test]
fn test_unreachable_endpoint_is_an_error() {
    for client in unreachable_clients() {
        let result = client.generate(&request());
        match result {
            Err(Error::OperationFailed { operation, .. }) => {
                assert!(
                    operation.starts_with(client.name()),
                    "unexpected operation {operation} for {}",
                    client.name()
                );
            },
            other => panic!("{} should fail, got {other:?}", client.name()),
        }
    }
}

#[test]
fn test_unreachable_endpoint_yields_failure_reply() {
    for client in unreachable_clients() {
        let orchestrator = Orchestrator::from_boxed(client);
        let mut applied = 0;
        let turn = orchestrator
            .converse("Log 200 for lunch", &AppState::default(), |_| applied += 1)
            .unwrap();
        assert_eq!(turn.reply, FAILURE_REPLY);
        assert_eq!(turn.outcome, TurnOutcome::Failed);
        assert_eq!(applied, 0);
        assert!(!orchestrator.is_busy());
    }
}

#[test]
fn test_malformed_anthropic_key_rejected_before_network() {
    let client = AnthropicClient::new()
        .with_api_key("not-a-real-key")
        .with_endpoint(DEAD_ENDPOINT);
    let err = client.generate(&request()).unwrap_err();
    assert!(err.to_string().contains("Invalid API key format"));
}

#[test_case(LlmProvider::Gemini, "gemini" ; "gemini")]
#[test_case(LlmProvider::OpenAi, "openai" ; "openai")]
#[test_case(LlmProvider::Anthropic, "anthropic" ; "anthropic")]
fn test_factory_honours_base_url(provider: LlmProvider, name: &str) {
    let config = LlmConfig {
        provider,
        api_key: Some("sk-ant-REDACTED".to_string()),
        base_url: Some(DEAD_ENDPOINT.to_string()),
        timeout_ms: Some(2_000),
        connect_timeout_ms: Some(500),
        ..LlmConfig::default()
    };
    let model = build_chat_model(&config);
    assert_eq!(model.name(), name);
    assert!(model.generate(&request()).is_err());
}
