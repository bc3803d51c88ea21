/*!
 * Chat Module
 * Prompt validation and the responder behind POST /api/chat
 */
pub mod upstream;

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::ChatUpstreamConfig;
pub use upstream::UpstreamChat;

/// Reply given to every valid prompt while no upstream is configured.
pub const CANNED_OUTPUT: &str = "Sorry! I'm still learning how to respond. In the meantime, please read more about me at: https://krru.dev/kozu";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

/// A request body classified once at the handler boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPrompt {
    Valid(String),
    Invalid,
}

impl ChatPrompt {
    /// Classify a raw request body.
    ///
    /// A body that is not JSON counts as `{}`. The prompt must be a
    /// non-empty string.
    pub fn from_body(body: &[u8]) -> Self {
        let value = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::Object(Default::default()));
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Self {
        match value.get("prompt") {
            Some(Value::String(prompt)) if !prompt.is_empty() => Self::Valid(prompt.clone()),
            _ => Self::Invalid,
        }
    }
}

/// What the handler sends back for a valid prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub status: StatusCode,
    pub body: ReplyBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// Sent as `{"output": ...}`.
    Output(String),
    /// Already JSON, sent as is.
    Json(String),
}

impl ChatReply {
    pub fn output(status: StatusCode, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ReplyBody::Output(text.into()),
        }
    }
}

/// Source of chat replies.
#[derive(Debug, Clone, Default)]
pub enum ChatBackend {
    /// Always answers with [`CANNED_OUTPUT`].
    #[default]
    Canned,
    /// Forwards the prompt to an external service.
    Upstream(UpstreamChat),
}

impl ChatBackend {
    /// Upstream when a URL is configured, canned otherwise.
    pub fn from_config(config: &ChatUpstreamConfig) -> Result<Self, ChatError> {
        match &config.url {
            Some(url) => {
                let upstream = UpstreamChat::new(url.clone(), config.api_key.clone(), config.timeout)?;
                tracing::info!(url = %url, "chat requests will be forwarded upstream");
                Ok(Self::Upstream(upstream))
            }
            None => {
                tracing::info!("no chat upstream configured, using canned replies");
                Ok(Self::Canned)
            }
        }
    }

    pub async fn respond(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        match self {
            Self::Canned => Ok(ChatReply::output(StatusCode::OK, CANNED_OUTPUT)),
            Self::Upstream(upstream) => upstream.forward(prompt).await,
        }
    }
}
