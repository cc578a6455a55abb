//! Messaging API client for outbound push messages.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

/// Errors returned by the Messaging API.
#[derive(Debug, Error)]
pub enum LineApiError {
    #[error("push request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("push rejected with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Capability to push a text message to a chat.
///
/// Implemented by [`MessagingClient`] in production and by fakes in tests.
#[async_trait]
pub trait PushApi: Send + Sync {
    async fn push_text(&self, to: &str, text: &str) -> Result<(), LineApiError>;
}

#[derive(Debug, Serialize)]
struct PushMessageRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// HTTP client for `POST /v2/bot/message/push`.
#[derive(Clone)]
pub struct MessagingClient {
    client: Client,
    base_url: String,
    channel_token: String,
}

impl MessagingClient {
    pub fn new(
        base_url: impl Into<String>,
        channel_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LineApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            channel_token: channel_token.into(),
        })
    }

    fn push_url(&self) -> String {
        format!("{}/v2/bot/message/push", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PushApi for MessagingClient {
    async fn push_text(&self, to: &str, text: &str) -> Result<(), LineApiError> {
        let payload = PushMessageRequest {
            to,
            messages: [TextMessage { kind: "text", text }],
        };

        let resp = self
            .client
            .post(self.push_url())
            .bearer_auth(&self.channel_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(to = to, is_timeout = e.is_timeout(), error = %e, "line_push_transport_error");
                e
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(to = to, status_code = status.as_u16(), body = %body, "line_push_rejected");
            return Err(LineApiError::Rejected { status, body });
        }

        info!(to = to, text_length = text.len(), "line_push_sent");
        Ok(())
    }
}
