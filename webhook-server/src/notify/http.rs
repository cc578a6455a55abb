//! HTTP sink: POSTs each message as JSON.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use url::Url;

use super::NotificationSink;
use crate::relay::NormalizedMessage;

#[derive(Clone)]
pub struct HttpSink {
    client: Client,
    url: Url,
}

impl HttpSink {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationSink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn deliver(&self, message: &NormalizedMessage) -> Result<()> {
        let resp = self
            .client
            .post(self.url.clone())
            .json(message)
            .send()
            .await
            .context("Failed to reach notification endpoint")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("notification endpoint returned {status}");
        }

        info!(
            url = %self.url,
            status_code = status.as_u16(),
            group_id = %message.group_id,
            "http_sink_delivered"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_sink_unreachable_is_error() {
        let sink = HttpSink::new(
            "http://127.0.0.1:1/notify".parse().unwrap(),
            Duration::from_millis(500),
        )
        .unwrap();
        let msg = NormalizedMessage::new("C1", "U1", "hi", 1).unwrap();
        assert!(sink.deliver(&msg).await.is_err());
    }
}
