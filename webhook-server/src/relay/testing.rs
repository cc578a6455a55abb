//! Test doubles for the relay's injected capabilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::mpsc;

use crate::line::{LineApiError, PushApi};
use crate::notify::NotificationSink;
use crate::relay::NormalizedMessage;

/// Sink that hands every message to a channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NormalizedMessage>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NormalizedMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn deliver(&self, message: &NormalizedMessage) -> Result<()> {
        self.tx
            .send(message.clone())
            .map_err(|_| anyhow!("receiver dropped"))
    }
}

/// Sink that waits before handing off to another sink.
pub struct DelayedSink<S> {
    inner: S,
    delay: Duration,
}

impl<S> DelayedSink<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<S: NotificationSink> NotificationSink for DelayedSink<S> {
    fn name(&self) -> &'static str {
        "delayed"
    }

    async fn deliver(&self, message: &NormalizedMessage) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.deliver(message).await
    }
}

pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn deliver(&self, _message: &NormalizedMessage) -> Result<()> {
        Err(anyhow!("sink unavailable"))
    }
}

/// Sink that never completes.
pub struct StallingSink;

#[async_trait]
impl NotificationSink for StallingSink {
    fn name(&self) -> &'static str {
        "stalling"
    }

    async fn deliver(&self, _message: &NormalizedMessage) -> Result<()> {
        std::future::pending().await
    }
}

/// Push API fake that records calls and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingPushApi {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
    attempts: Arc<AtomicUsize>,
}

impl RecordingPushApi {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushApi for RecordingPushApi {
    async fn push_text(&self, to: &str, text: &str) -> Result<(), LineApiError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LineApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                body: r#"{"message":"The property, 'to', in the request body is invalid"}"#
                    .to_string(),
            });
        }
        self.calls
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }
}
