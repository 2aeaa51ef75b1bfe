//! Drives `GoogleProvider` against a local stand-in for the Gemini API.

use std::collections::HashMap;

use axum::extract::{Json, Path, Query};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use tb_domain::config::LlmConfig;
use tb_domain::error::Error;
use tb_providers::google::GoogleProvider;
use tb_providers::{CompletionRequest, LlmProvider};

/// Echoes the prompt back, or fails when the key is "bad".
async fn generate(
    Path(call): Path<String>,
    Query(q): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if q.get("key").map(String::as_str) == Some("bad") {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": { "message": "API key not valid" } })),
        );
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let model = call.trim_end_matches(":generateContent").to_string();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": format!("{model} says: {prompt}") }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 6, "totalTokenCount": 10 }
        })),
    )
}

async fn start_mock() -> String {
    let app = Router::new().route("/v1beta/models/:call", post(generate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base_url: String) -> LlmConfig {
    LlmConfig {
        base_url,
        timeout_ms: 5_000,
        ..LlmConfig::default()
    }
}

#[tokio::test]
async fn completes_against_mock_api() {
    let base = start_mock().await;
    let provider = GoogleProvider::from_config(&config(base), "good".into()).unwrap();

    let out = provider
        .complete(&CompletionRequest::new("User: hi\nAI:"))
        .await
        .unwrap();

    assert_eq!(out.text, "gemini-2.5-flash-lite says: User: hi\nAI:");
    assert_eq!(out.finish_reason.as_deref(), Some("stop"));
    assert_eq!(out.usage.unwrap().total_tokens, 10);
}

#[tokio::test]
async fn model_override_is_used_in_path() {
    let base = start_mock().await;
    let provider = GoogleProvider::from_config(&config(base), "good".into()).unwrap();

    let req = CompletionRequest {
        prompt: "x".into(),
        model: Some("gemini-2.0-flash".into()),
    };
    let out = provider.complete(&req).await.unwrap();
    assert_eq!(out.text, "gemini-2.0-flash says: x");
    assert_eq!(out.model, "gemini-2.0-flash");
}

#[tokio::test]
async fn non_success_status_is_provider_error() {
    let base = start_mock().await;
    let provider = GoogleProvider::from_config(&config(base), "bad".into()).unwrap();

    let err = provider
        .complete(&CompletionRequest::new("hi"))
        .await
        .unwrap_err();

    match err {
        Error::Provider { provider, message } => {
            assert_eq!(provider, "google");
            assert!(message.starts_with("HTTP 400"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    // Port 1 on loopback refuses connections.
    let provider =
        GoogleProvider::from_config(&config("http://127.0.0.1:1".into()), "k".into()).unwrap();
    let err = provider
        .complete(&CompletionRequest::new("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_) | Error::Timeout(_)));
}
