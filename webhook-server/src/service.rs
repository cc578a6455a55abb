//! The bot service: everything `/webhook` and `/send` need, built once.
//!
//! Constructed at startup and shared read-only across request tasks. If the
//! credentials are missing it is simply never built and the router runs in
//! its uninitialized state.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Credentials;
use crate::error::AppError;
use crate::line::{Callback, MessagingClient, PushApi};
use crate::notify::NotificationSink;
use crate::relay::{classify, Forwarder, PushDispatcher, SendRequest};
use crate::web::signature::verify_line_signature;
use crate::Config;

pub struct BotService {
    channel_secret: String,
    forwarder: Forwarder,
    dispatcher: PushDispatcher,
}

impl BotService {
    pub fn new(channel_secret: String, forwarder: Forwarder, api: Arc<dyn PushApi>) -> Self {
        Self {
            channel_secret,
            forwarder,
            dispatcher: PushDispatcher::new(api),
        }
    }

    /// Build the service from configuration, or `None` when it cannot run.
    pub fn from_config(config: &Config, sink: Arc<dyn NotificationSink>) -> Option<Self> {
        let Some(Credentials {
            channel_secret,
            channel_token,
        }) = config.credentials()
        else {
            warn!(
                has_channel_secret = config.channel_secret.is_some(),
                has_channel_token = config.channel_token.is_some(),
                "credentials_missing"
            );
            return None;
        };

        let client = match MessagingClient::new(
            config.line_api_base_url.as_str(),
            channel_token,
            config.request_timeout(),
        ) {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "messaging_client_create_failed");
                return None;
            }
        };

        let forwarder = Forwarder::new(sink, config.notify_timeout());
        info!(api_base_url = %config.line_api_base_url, "bot_service_ready");

        Some(Self::new(channel_secret, forwarder, Arc::new(client)))
    }

    /// Verify a webhook delivery and forward its group text messages.
    ///
    /// Returns how many messages were handed to the sink. Sink outcomes
    /// never affect the result.
    pub fn handle_webhook(&self, body: &[u8], signature: Option<&str>) -> Result<usize, AppError> {
        verify_line_signature(&self.channel_secret, body, signature)
            .map_err(|_| AppError::InvalidSignature)?;

        let callback: Callback = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, body_length = body.len(), "webhook_parse_failed");
            AppError::Internal
        })?;

        let messages = classify(&callback.events);
        let forwarded = messages.len();

        info!(
            destination = %callback.destination,
            event_count = callback.events.len(),
            group_message_count = forwarded,
            "webhook_processed"
        );

        if forwarded > 0 {
            // Not awaited: the ack must not wait on the sink. The forwarder
            // still tracks the task for shutdown draining.
            drop(self.forwarder.forward_all(messages));
        }

        Ok(forwarded)
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    pub async fn send(&self, req: &SendRequest) -> Result<(), AppError> {
        self.dispatcher.push(req).await
    }
}
