use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::{bad_request, internal_error, AppState};
use crate::models::MessageKind;
use crate::services::companion::{journal_context, ChatCompanion};
use crate::services::llm::LlmClient;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// POST /api/chat: append the user message, ask the companion with recent
/// journal context, append and return the AI reply.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendMessageRequest>,
) -> Response {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return bad_request("Message is required");
    }

    let entries = state.store.entries().unwrap_or_default();
    if let Err(e) = state.store.append_chat(MessageKind::User, message.clone()) {
        return internal_error(e);
    }

    let settings = state.store.settings().unwrap_or_default();
    let companion = ChatCompanion::new(LlmClient::new(&settings.ai));
    let prompt = format!(
        "User question: {}\n\nRecent journal context:\n{}",
        message,
        journal_context(&entries)
    );

    let reply = match companion.reply(&prompt).await {
        Ok(reply) => reply,
        Err(e) => return bad_request(&e.to_string()),
    };

    match state
        .store
        .append_chat(MessageKind::Ai, reply.chat_response)
    {
        Ok(ai_message) => (StatusCode::OK, Json(ai_message)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/chat: the full append-only history.
pub async fn history(State(state): State<Arc<AppState>>) -> Response {
    match state.store.chat_history() {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => internal_error(e),
    }
}
