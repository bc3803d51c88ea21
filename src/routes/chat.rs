/**
 * Chat Route
 * POST /api/chat
 */
use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatPrompt, ChatReply, ReplyBody};
use crate::routes::ErrorResponse;
use crate::state::AppState;

pub const MISSING_PROMPT: &str = "Missing prompt";

/// Successful response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub output: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn reply_response(reply: ChatReply) -> Response {
    match reply.body {
        ReplyBody::Output(output) => (reply.status, Json(ChatResponse { output })).into_response(),
        ReplyBody::Json(raw) => (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(raw),
        )
            .into_response(),
    }
}

/// POST /api/chat - Answer a prompt
pub async fn chat(State(state): State<AppState>, body: Result<Bytes, BytesRejection>) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::error!(error = %message, "failed to read chat request body");
            return error(StatusCode::INTERNAL_SERVER_ERROR, message);
        }
    };

    let prompt = match ChatPrompt::from_body(&body) {
        ChatPrompt::Valid(prompt) => prompt,
        ChatPrompt::Invalid => return error(StatusCode::BAD_REQUEST, MISSING_PROMPT),
    };

    tracing::debug!(prompt_len = prompt.len(), "chat prompt accepted");

    match state.chat.respond(&prompt).await {
        Ok(reply) => reply_response(reply),
        Err(e) => {
            tracing::error!(error = %e, "chat backend failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
