use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::{ChatError, ChatReply, ReplyBody};

/// Forwards prompts to an external chat service.
#[derive(Debug, Clone)]
pub struct UpstreamChat {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl UpstreamChat {
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    /// POST `{"prompt": ...}` upstream and map the answer.
    ///
    /// JSON answers pass through with the upstream status; anything else
    /// is wrapped as `{"output": text}`.
    pub async fn forward(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "prompt": prompt }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(url = %self.url, error = %e, "chat upstream request failed");
            e
        })?;

        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "could not read chat upstream body");
                String::new()
            }
        };

        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "chat upstream returned error");
        }

        let body = if is_json {
            ReplyBody::Json(text)
        } else {
            ReplyBody::Output(text)
        };
        Ok(ChatReply { status, body })
    }
}
