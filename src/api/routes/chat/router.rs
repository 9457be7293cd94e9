//! Router for the chat API

use std::sync::Arc;

use axum::{
    Router, body::Bytes, extract::State, http::StatusCode, response::Json, routing::post,
};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Relay a single message to the completion API and return the reply
async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<public::ChatResponse>, ApiError> {
    // The body is decoded as JSON whatever the content type says, so
    // clients like `curl -d` work. A body that isn't a JSON object with
    // a string `message` is the caller's fault, same as an empty message
    let payload: public::ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Failed to parse the request body as JSON: {}", e),
        )
    })?;

    let reply = state.relay.relay(payload.message.as_deref()).await?;

    Ok(Json(reply.into()))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
