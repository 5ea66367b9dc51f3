//! HTTP tests for the OpenAI-compatible provider against a mock server.

use std::time::Duration;

use dinebot::error::BotError;
use dinebot::provider::http::build_client;
use dinebot::provider::{ModelProvider, OpenAiCompatibleProvider, ProviderRequest};
use dinebot::tools::default_registry;
use dinebot::types::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(
        "deepseek",
        "deepseek-chat",
        "test-key",
        Some(server.uri()),
        build_client(Duration::from_secs(5)).unwrap(),
    )
}

fn request() -> ProviderRequest {
    ProviderRequest {
        messages: vec![
            ModelMessage::system("system"),
            ModelMessage::user("Tell me about Luigi's"),
        ],
        settings: GenerationSettings {
            max_tokens: Some(256),
            temperature: Some(0.7),
        },
        tools: Some(default_registry().unwrap().describe()),
    }
}

#[tokio::test]
async fn parses_tool_call_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "max_tokens": 256,
            "tools": [{"type": "function", "function": {"name": "get_restaurant_info"}}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "get_restaurant_info",
                            "arguments": "{\"restaurant_name\": \"Luigi's\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 12, "total_tokens": 62}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).generate_text(&request()).await.unwrap();

    assert_eq!(response.text, "");
    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.usage.total_tokens, 62);
    assert_eq!(
        response.tool_calls,
        vec![ToolCall {
            id: "call_abc".into(),
            name: "get_restaurant_info".into(),
            arguments: "{\"restaurant_name\": \"Luigi's\"}".into(),
        }]
    );
}

#[tokio::test]
async fn parses_text_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Luigi's is lovely."},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let response = provider(&server).generate_text(&request()).await.unwrap();
    assert_eq!(response.text, "Luigi's is lovely.");
    assert!(response.tool_calls.is_empty());
    assert_eq!(response.usage, Usage::default());
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Authentication Fails (no such user)"}
        })))
        .mount(&server)
        .await;

    let err = provider(&server).generate_text(&request()).await.unwrap_err();
    assert!(matches!(err, BotError::Authentication(m) if m.contains("Authentication Fails")));
}

#[tokio::test]
async fn server_error_is_retryable_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = provider(&server).generate_text(&request()).await.unwrap_err();
    assert!(matches!(err, BotError::Api { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn non_json_body_is_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).generate_text(&request()).await.unwrap_err();
    assert!(matches!(err, BotError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_server_hits_client_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(
        "deepseek",
        "deepseek-chat",
        "test-key",
        Some(server.uri()),
        build_client(Duration::from_millis(50)).unwrap(),
    );
    let err = provider.generate_text(&request()).await.unwrap_err();
    assert!(matches!(err, BotError::Network(ref e) if e.is_timeout()));
    assert!(err.is_retryable());
}
