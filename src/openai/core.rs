use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

// Only the parts of the completion object that get consumed. Everything
// else the API sends back is ignored.
//
// {
//   "id": "chatcmpl-123",
//   "model": "gpt-3.5-turbo-0125",
//   "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}}],
//   "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
// }
#[derive(Deserialize, Debug, Default)]
pub struct CompletionResponse {
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Value>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice. Empty content is treated the same as
    /// no content at all.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .filter(|content| !content.is_empty())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

// Keeps forwarded error bodies (HTML error pages and the like) short
const BODY_EXCERPT_CHARS: usize = 200;

fn status_text(status: &StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("{} status code (no body)", status.as_u16())
    } else {
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        format!("{} {}", status.as_u16(), excerpt)
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// Non-success status without the usual `{"error": {"message"}}` body
    #[error("{}", status_text(.status, .body))]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl CompletionError {
    /// The error text reported by the upstream side, as shown to a
    /// user.
    pub fn upstream_message(&self) -> String {
        match self {
            CompletionError::Api { message, .. } => message.clone(),
            CompletionError::Status { .. } => self.to_string(),
            CompletionError::Http(e) => e.to_string(),
        }
    }
}

pub async fn completion(
    client: &reqwest::Client,
    request: &CompletionRequest,
    api_hostname: &str,
    api_key: &str,
) -> Result<CompletionResponse, CompletionError> {
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Completion API error {}: {}", status, body);

        return match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody {
                error:
                    ApiErrorDetail {
                        message: Some(message),
                    },
            }) if !message.is_empty() => Err(CompletionError::Api { status, message }),
            _ => Err(CompletionError::Status { status, body }),
        };
    }

    Ok(response.json::<CompletionResponse>().await?)
}
