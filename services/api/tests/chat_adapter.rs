//! Tests for the OpenAI-compatible chat adapter against a mock HTTP server.

use api_lib::{adapters::OpenAiChatAdapter, web::chat_task::RemoteResponder};
use portfolio_core::{ChatCompletionService, KeywordResponder, PortError, RuleTable};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "llama-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn adapter(mock_server: &MockServer) -> OpenAiChatAdapter {
    let client = OpenAiChatAdapter::client("test-key", &mock_server.uri());
    OpenAiChatAdapter::new(client, "llama-test".to_string())
}

#[tokio::test]
async fn sends_model_and_limits_and_returns_first_choice() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama-test",
            "max_tokens": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("I build Salesforce apps.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = adapter(&mock_server).complete("What do you do?").await;
    assert_eq!(reply.unwrap(), "I build Salesforce apps.");
}

#[tokio::test]
async fn unauthorized_maps_to_external_service_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Invalid API Key",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&mock_server)
        .await;

    let result = adapter(&mock_server).complete("hello").await;
    assert!(
        matches!(result, Err(PortError::ExternalService(_))),
        "Expected ExternalService, got: {:?}",
        result
    );
}

#[tokio::test]
async fn empty_content_counts_as_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
        .mount(&mock_server)
        .await;

    let result = adapter(&mock_server).complete("hello").await;
    assert!(matches!(result, Err(PortError::ExternalService(_))));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let started = Instant::now();
    let result = adapter(&mock_server).complete("hello").await;
    assert!(matches!(result, Err(PortError::ExternalService(_))));
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "took {:?}",
        started.elapsed()
    );
    mock_server.verify().await;
}

#[tokio::test]
async fn rate_limit_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "message": "Rate limit reached",
                "type": "requests",
                "param": null,
                "code": "rate_limit_exceeded"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = adapter(&mock_server).complete("hello").await;
    assert!(matches!(result, Err(PortError::ExternalService(_))));
    mock_server.verify().await;
}

#[tokio::test]
async fn outage_falls_back_without_waiting_for_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fallback = KeywordResponder::new(RuleTable::portfolio().unwrap());
    let expected = fallback.respond("what are your skills").to_string();
    let responder = RemoteResponder::new(
        Some(Arc::new(adapter(&mock_server))),
        fallback,
        Duration::from_secs(3),
    );

    let started = Instant::now();
    let reply = responder.respond("what are your skills").await;
    assert_eq!(reply, expected);
    assert!(started.elapsed() < Duration::from_secs(1));
    mock_server.verify().await;
}
