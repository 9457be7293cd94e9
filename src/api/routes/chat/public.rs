//! Public types for the chat API
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::relay::RelayReply;

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ChatRequest {
    // Optional so a missing field is reported as "Message is required"
    // instead of a deserialization failure
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub usage: Value,
}

impl From<RelayReply> for ChatResponse {
    fn from(reply: RelayReply) -> Self {
        Self {
            reply: reply.reply,
            model: reply.model,
            usage: reply.usage,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
