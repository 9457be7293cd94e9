//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};

use chat_relay::api::AppState;
use chat_relay::api::app;
use chat_relay::core::AppConfig;

/// Config pointing the relay at `openai_api_hostname`, typically a
/// `mockito` server standing in for the completion API.
pub fn test_config(openai_api_hostname: &str, openai_api_key: Option<&str>) -> AppConfig {
    AppConfig {
        openai_api_hostname: openai_api_hostname.to_string(),
        openai_api_key: openai_api_key.map(String::from),
        openai_model: String::from("gpt-3.5-turbo"),
        max_tokens: 500,
    }
}

/// Creates a test application router from the given config.
pub fn test_app(config: AppConfig) -> Router {
    let app_state = AppState::new(&config);
    app(Arc::new(app_state))
}

/// Serves the app on an ephemeral local port and returns its base URL.
pub async fn spawn_app(config: AppConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    let app = test_app(config);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

/// A completion API response in the shape OpenAI returns.
pub fn completion_body(model: &str, content: Option<&str>) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": model,
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    })
    .to_string()
}
