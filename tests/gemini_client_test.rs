//! Tests for the Gemini client against a local mock of the REST API

use mockito::{Matcher, Server, ServerGuard};
use persona_chat::llm::{GeminiClient, GenerationConfig, LlmError, TextGenerator};
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::broadcast;

const PRIMARY: &str = "gemini-2.0-flash";
const FALLBACK: &str = "gemini-1.5-flash";

fn endpoint(model: &str) -> String {
    format!("/v1/models/{}:generateContent", model)
}

fn client(server: &ServerGuard, fallback: Option<&str>) -> GeminiClient {
    GeminiClient::new(Some(SecretString::from("test-key".to_string())), PRIMARY)
        .expect("Failed to create Gemini client")
        .with_fallback(fallback.map(str::to_string))
        .with_base_url(format!("{}/v1/models", server.url()))
}

fn candidate_body(parts: &[&str]) -> String {
    let parts: Vec<_> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{"content": {"role": "model", "parts": parts}, "finishReason": "STOP"}],
        "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30, "totalTokenCount": 150}
    })
    .to_string()
}

#[tokio::test]
async fn test_primary_success_sends_prompt_and_config() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Hello prompt".to_string()),
            Matcher::PartialJson(json!({"generationConfig": {"maxOutputTokens": 220}})),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body(&["I'm Prem", ", from Vapi."]))
        .expect(1)
        .create_async()
        .await;

    let result = client(&server, None).generate("Hello prompt").await.unwrap();

    assert_eq!(result.text, "I'm Prem, from Vapi.");
    assert_eq!(result.usage.unwrap()["totalTokenCount"], 150);
    primary.assert_async().await;
}

#[tokio::test]
async fn test_custom_generation_config_is_sent() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {"temperature": 0.5, "topP": 0.5, "maxOutputTokens": 64}
        })))
        .with_status(200)
        .with_body(candidate_body(&["Short."]))
        .expect(1)
        .create_async()
        .await;

    let config = GenerationConfig::new(64).with_temperature(0.5).with_top_p(0.5);
    let result = client(&server, None)
        .with_generation_config(config)
        .generate("prompt")
        .await
        .unwrap();

    assert_eq!(result.text, "Short.");
    primary.assert_async().await;
}

#[tokio::test]
async fn test_fallback_is_tried_exactly_once() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(404)
        .with_body(r#"{"error":{"message":"model not found"}}"#)
        .expect(1)
        .create_async()
        .await;
    let fallback = server
        .mock("POST", endpoint(FALLBACK).as_str())
        .with_status(200)
        .with_body(candidate_body(&["From the fallback."]))
        .expect(1)
        .create_async()
        .await;

    let (sender, mut receiver) = broadcast::channel(4);
    let client = client(&server, Some(FALLBACK)).with_usage_events(sender);
    let result = client.generate("prompt").await.unwrap();

    assert_eq!(result.text, "From the fallback.");
    primary.assert_async().await;
    fallback.assert_async().await;

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.model, FALLBACK);
    assert_eq!(event.usage.unwrap()["totalTokenCount"], 150);
}

#[tokio::test]
async fn test_failure_after_fallback_carries_final_status() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let fallback = server
        .mock("POST", endpoint(FALLBACK).as_str())
        .with_status(429)
        .with_body("quota")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server, Some(FALLBACK)).generate("prompt").await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    primary.assert_async().await;
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_no_fallback_when_unconfigured() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let any_other = server
        .mock("POST", Matcher::Regex(format!("^/v1/models/{}", FALLBACK)))
        .expect(0)
        .create_async()
        .await;

    let err = client(&server, None).generate("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::HttpError { status: 500, .. }));
    primary.assert_async().await;
    any_other.assert_async().await;
}

#[tokio::test]
async fn test_no_fallback_when_equal_to_primary() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server, Some(PRIMARY)).generate("prompt").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    primary.assert_async().await;
}

#[tokio::test]
async fn test_blank_candidate_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(200)
        .with_body(candidate_body(&["   "]))
        .create_async()
        .await;

    let err = client(&server, None).generate("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_unrecognized_shape_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(200)
        .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
        .create_async()
        .await;

    let err = client(&server, None).generate("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn test_non_json_success_body_is_serialization_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(200)
        .with_body("<html>proxy page</html>")
        .create_async()
        .await;

    let err = client(&server, None).generate("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::SerializationError(_)));
}

#[tokio::test]
async fn test_legacy_usage_field_is_read() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", endpoint(PRIMARY).as_str())
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
                "usage": {"total_tokens": 12}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let result = client(&server, None).generate("prompt").await.unwrap();

    assert_eq!(result.usage, Some(json!({"total_tokens": 12})));
}

#[tokio::test]
async fn test_list_models() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/models")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_body(r#"{"models":[{"name":"models/gemini-2.0-flash"},{"name":"models/gemini-1.5-flash"}]}"#)
        .create_async()
        .await;

    let models = client(&server, None).list_models().await.unwrap();

    assert_eq!(models, vec!["models/gemini-2.0-flash", "models/gemini-1.5-flash"]);
}

#[tokio::test]
async fn test_transport_error_skips_fallback() {
    let client = GeminiClient::new(Some(SecretString::from("test-key".to_string())), PRIMARY)
        .unwrap()
        .with_fallback(Some(FALLBACK.to_string()))
        .with_base_url("http://127.0.0.1:1/v1/models");

    let err = client.generate("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::Transport(_)));
}
