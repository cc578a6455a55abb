//! Log-only sink.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use super::NotificationSink;
use crate::relay::NormalizedMessage;

/// Emits each message as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, message: &NormalizedMessage) -> Result<()> {
        let payload = serde_json::to_string(message).context("Failed to serialize message")?;

        info!(
            group_id = %message.group_id,
            user_name = %message.display_name,
            timestamp = message.timestamp_millis,
            payload = %payload,
            "group_message_notified"
        );

        Ok(())
    }
}
