//! Forwards a single user message to the completion API and reshapes
//! the answer for the chat endpoint.
//!
//! A `Relay` holds no per-call state. Every invocation is independent
//! and only ever sends the one message it was given.

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::core::AppConfig;
use crate::openai::{CompletionRequest, Message, Role, completion};

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const API_KEY_NOT_CONFIGURED: &str =
    "OpenAI API key is not configured. Please set OPENAI_API_KEY in your environment.";
pub const UPSTREAM_FALLBACK: &str = "Failed to get response from OpenAI";
pub const EMPTY_REPLY_PLACEHOLDER: &str = "No response";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("{}", MESSAGE_REQUIRED)]
    InvalidInput,
    #[error("{}", API_KEY_NOT_CONFIGURED)]
    MisconfiguredService,
    #[error("{0}")]
    UpstreamFailure(String),
}

impl RelayError {
    /// An upstream failure carrying `text`, or a generic message when
    /// upstream gave nothing readable.
    pub fn upstream(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            RelayError::UpstreamFailure(UPSTREAM_FALLBACK.to_string())
        } else {
            RelayError::UpstreamFailure(text.to_string())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput => StatusCode::BAD_REQUEST,
            RelayError::MisconfiguredService => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub api_hostname: String,
    pub model: String,
    pub max_tokens: u32,
}

impl From<&AppConfig> for RelayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            api_hostname: config.openai_api_hostname.clone(),
            model: config.openai_model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    pub reply: String,
    pub model: String,
    // Forwarded as-is, `Null` when upstream reported none
    pub usage: Value,
}

#[derive(Clone)]
pub struct Relay {
    config: RelayConfig,
    client: reqwest::Client,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send `message` upstream and return the first completion.
    ///
    /// Input is validated before the credential so a bad request is
    /// always reported as the caller's fault.
    pub async fn relay(&self, message: Option<&str>) -> Result<RelayReply, RelayError> {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(RelayError::InvalidInput),
        };

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RelayError::MisconfiguredService)?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::new(Role::User, message)],
            max_tokens: self.config.max_tokens,
        };

        let resp = completion(&self.client, &request, &self.config.api_hostname, api_key)
            .await
            .map_err(|e| {
                tracing::error!("OpenAI API error: {}", e);
                RelayError::upstream(&e.upstream_message())
            })?;

        let reply = resp
            .first_content()
            .unwrap_or(EMPTY_REPLY_PLACEHOLDER)
            .to_string();
        let model = resp.model.unwrap_or(request.model);

        Ok(RelayReply {
            reply,
            model,
            usage: resp.usage.unwrap_or(Value::Null),
        })
    }
}
