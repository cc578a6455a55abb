//! Relay pipeline.
//!
//! ```text
//! webhook batch → classify() → Forwarder → NotificationSink
//! SendRequest   → PushDispatcher → PushApi
//! ```

pub mod classify;
pub mod forward;
pub mod push;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::classify;
pub use forward::Forwarder;
pub use push::PushDispatcher;
pub use types::{display_name, NormalizedMessage, SendRequest, UNKNOWN_USER};
