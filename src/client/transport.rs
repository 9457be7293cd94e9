use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::public::chat::{ChatResponse, ErrorResponse};

pub const RESPONSE_FALLBACK: &str = "Failed to get response";

/// Body of a single relay call. Only ever holds the latest message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay answered with an error-shaped response
    #[error("{0}")]
    Relay(String),
    /// The relay could not be reached or its answer could not be read
    #[error("{0}")]
    Network(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<ChatResponse, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpRelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches("/").to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, request: &RelayRequest) -> Result<ChatResponse, ClientError> {
        let response = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .map(|resp| resp.error)
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| RESPONSE_FALLBACK.to_string());
            return Err(ClientError::Relay(message));
        }

        serde_json::from_str::<ChatResponse>(&body)
            .map_err(|e| ClientError::Network(format!("Invalid response from relay: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = HttpRelayClient::new("http://127.0.0.1:3000/");
        assert_eq!(client.url(), "http://127.0.0.1:3000/api/chat");
    }

    #[tokio::test]
    async fn test_send_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::Json(serde_json::json!({"message": "Hello"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"reply": "Hi there!", "model": "gpt-3.5-turbo", "usage": {"total_tokens": 12}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url());
        let resp = client
            .send(&RelayRequest {
                message: String::from("Hello"),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.reply, "Hi there!");
        assert_eq!(resp.model, "gpt-3.5-turbo");
        assert_eq!(resp.usage["total_tokens"], 12);
    }

    #[tokio::test]
    async fn test_send_error_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Rate limit reached"}"#)
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url());
        let err = client
            .send(&RelayRequest {
                message: String::from("Hello"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Relay(_)));
        assert_eq!(err.to_string(), "Rate limit reached");
    }

    #[tokio::test]
    async fn test_send_error_without_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(502)
            .create_async()
            .await;

        let client = HttpRelayClient::new(&server.url());
        let err = client
            .send(&RelayRequest {
                message: String::from("Hello"),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), RESPONSE_FALLBACK);
    }

    #[tokio::test]
    async fn test_send_network_failure() {
        // Nothing listens on the discard port
        let client = HttpRelayClient::new("http://127.0.0.1:9");
        let err = client
            .send(&RelayRequest {
                message: String::from("Hello"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert!(!err.to_string().is_empty());
    }
}
