//! Notification sinks for normalized group messages.
//!
//! A sink is the hand-off point to whatever tells the companion app about a
//! new message. The relay only requires that a sink accept a
//! [`NormalizedMessage`]; delivery is best-effort and failures stay here.
//!
//! - [`LogSink`]: structured log line (default)
//! - [`HttpSink`]: JSON POST to a configured URL
//! - [`QueueSink`]: persistent message on a durable RabbitMQ queue

pub mod http;
pub mod log;
pub mod queue;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::relay::NormalizedMessage;
use crate::Config;

pub use self::http::HttpSink;
pub use self::log::LogSink;
pub use self::queue::{QueueSink, NOTIFY_QUEUE};

/// Destination for normalized messages.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one message.
    async fn deliver(&self, message: &NormalizedMessage) -> Result<()>;

    /// Release connections on shutdown.
    async fn close(&self) {}
}

/// Pick the sink the configuration asks for.
///
/// A queue URL wins over a webhook URL; with neither, messages are logged.
pub fn sink_from_config(config: &Config) -> Result<Arc<dyn NotificationSink>> {
    let sink: Arc<dyn NotificationSink> = if let Some(url) = &config.notify_amqp_url {
        Arc::new(QueueSink::new(url.clone()))
    } else if let Some(url) = &config.notify_webhook_url {
        Arc::new(HttpSink::new(url.clone(), config.notify_timeout())?)
    } else {
        Arc::new(LogSink)
    };

    info!(sink = sink.name(), "notification_sink_selected");
    Ok(sink)
}
