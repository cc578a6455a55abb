//! LINE Messaging API plumbing.
//!
//! - Webhook callback types (what the platform sends us)
//! - Push client (what we send the platform)

pub mod client;
pub mod types;

pub use client::{LineApiError, MessagingClient, PushApi};
pub use types::{Callback, InboundEvent, MessageContent, MessageEvent, Source, SIGNATURE_HEADER};
