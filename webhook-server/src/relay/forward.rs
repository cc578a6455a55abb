//! Fire-and-forget hand-off of normalized messages to the notification sink.
//!
//! The webhook ack never waits on the sink. Deliveries run on a background
//! task, each bounded by a timeout, and their failures are only logged.
//! Tasks are tracked so shutdown can let already-acked messages finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::notify::NotificationSink;
use crate::relay::NormalizedMessage;

#[derive(Clone)]
pub struct Forwarder {
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
    tasks: TaskTracker,
}

impl Forwarder {
    pub fn new(sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        Self {
            sink,
            timeout,
            tasks: TaskTracker::new(),
        }
    }

    /// Wait up to `limit` for in-flight deliveries.
    ///
    /// Returns `false` if some were still running when the limit passed.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tasks.close();
        let pending = self.tasks.len();

        let drained = tokio::time::timeout(limit, self.tasks.wait()).await.is_ok();
        if drained {
            info!(pending_tasks = pending, "forwarder_drained");
        } else {
            warn!(
                pending_tasks = pending,
                remaining_tasks = self.tasks.len(),
                limit_ms = limit.as_millis() as u64,
                "forwarder_drain_timeout"
            );
        }
        drained
    }

    /// Forward a single message.
    pub fn forward(&self, message: NormalizedMessage) -> JoinHandle<()> {
        self.forward_all(vec![message])
    }

    /// Forward a batch in order on one background task.
    ///
    /// The returned handle can be awaited but callers on the request path
    /// drop it.
    pub fn forward_all(&self, messages: Vec<NormalizedMessage>) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let timeout = self.timeout;

        self.tasks.spawn(async move {
            for message in messages {
                deliver_one(sink.as_ref(), &message, timeout).await;
            }
        })
    }
}

async fn deliver_one(
    sink: &dyn NotificationSink,
    message: &NormalizedMessage,
    timeout: Duration,
) {
    match tokio::time::timeout(timeout, sink.deliver(message)).await {
        Ok(Ok(())) => {
            info!(
                sink = sink.name(),
                group_id = %message.group_id,
                user_name = %message.display_name,
                "group_message_forwarded"
            );
        }
        Ok(Err(e)) => {
            error!(
                sink = sink.name(),
                group_id = %message.group_id,
                error = %format!("{e:#}"),
                "group_message_forward_failed"
            );
        }
        Err(_) => {
            warn!(
                sink = sink.name(),
                group_id = %message.group_id,
                timeout_ms = timeout.as_millis() as u64,
                "group_message_forward_timeout"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::{ChannelSink, DelayedSink, FailingSink, StallingSink};

    fn msg(text: &str) -> NormalizedMessage {
        NormalizedMessage::new("C1", "U1", text, 1).unwrap()
    }

    #[tokio::test]
    async fn test_forward_all_preserves_order() {
        let (sink, mut rx) = ChannelSink::new();
        let forwarder = Forwarder::new(Arc::new(sink), Duration::from_secs(1));

        forwarder
            .forward_all(vec![msg("a"), msg("b"), msg("c")])
            .await
            .unwrap();

        let mut seen = Vec::new();
        while let Ok(m) = rx.try_recv() {
            seen.push(m.text);
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_sink_failure_is_contained() {
        let forwarder = Forwarder::new(Arc::new(FailingSink), Duration::from_secs(1));
        // The task completes normally even though every delivery fails
        forwarder.forward(msg("a")).await.unwrap();
    }

    #[tokio::test]
    async fn test_slow_sink_is_bounded() {
        let forwarder = Forwarder::new(Arc::new(StallingSink), Duration::from_millis(20));
        let handle = forwarder.forward_all(vec![msg("a"), msg("b")]);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("forwarding should give up on a stalled sink")
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_waits_for_pending_delivery() {
        let (sink, mut rx) = ChannelSink::new();
        let sink = DelayedSink::new(sink, Duration::from_millis(100));
        let forwarder = Forwarder::new(Arc::new(sink), Duration::from_secs(5));

        // Detached, as on the request path
        drop(forwarder.forward(msg("acked")));
        assert!(rx.try_recv().is_err());

        assert!(forwarder.drain(Duration::from_secs(2)).await);
        assert_eq!(rx.try_recv().unwrap().text, "acked");
    }

    #[tokio::test]
    async fn test_drain_is_bounded() {
        let forwarder = Forwarder::new(Arc::new(StallingSink), Duration::from_secs(60));
        drop(forwarder.forward(msg("stuck")));

        let started = std::time::Instant::now();
        assert!(!forwarder.drain(Duration::from_millis(50)).await);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_drain_with_nothing_pending() {
        let forwarder = Forwarder::new(Arc::new(FailingSink), Duration::from_secs(1));
        assert!(forwarder.drain(Duration::from_millis(10)).await);
    }
}
