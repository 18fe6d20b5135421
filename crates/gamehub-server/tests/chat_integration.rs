#[allow(dead_code)]
mod common;

use axum::http::StatusCode;
use common::{MockUpstream, TestServer};

#[tokio::test]
async fn chat_unavailable_without_key() {
    let server = TestServer::new().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "chat is not configured");
}

#[tokio::test]
async fn chat_forwards_message_and_instruction() {
    let upstream = MockUpstream::replying("Try Slope!").await;
    let server = TestServer::with_chat_upstream(&upstream.base_url()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .json(&serde_json::json!({
            "message": "what should I play?",
            "system_instruction": "Games: Chess Master, Slope."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["reply"], "Try Slope!");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/models/test-model:generateContent");
    assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        calls[0].body["contents"][0]["parts"][0]["text"],
        "what should I play?"
    );
    assert_eq!(
        calls[0].body["systemInstruction"]["parts"][0]["text"],
        "Games: Chess Master, Slope."
    );
}

#[tokio::test]
async fn upstream_error_is_bad_gateway() {
    let upstream = MockUpstream::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "error": { "message": "boom" } }),
    )
    .await;
    let server = TestServer::with_chat_upstream(&upstream.base_url()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn empty_upstream_reply_is_bad_gateway() {
    let upstream = MockUpstream::start(StatusCode::OK, serde_json::json!({ "candidates": [] })).await;
    let server = TestServer::with_chat_upstream(&upstream.base_url()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
}

#[tokio::test]
async fn blank_message_is_rejected_before_upstream() {
    let upstream = MockUpstream::replying("unused").await;
    let server = TestServer::with_chat_upstream(&upstream.base_url()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .json(&serde_json::json!({ "message": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(upstream.calls().is_empty());
}

#[tokio::test]
async fn malformed_body_is_client_error() {
    let server = TestServer::new().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/chat", server.base_url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
