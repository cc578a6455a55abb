//! LINE relay - group message bridge for a LINE bot.
//!
//! Receives LINE webhook deliveries, keeps the group text messages, and hands
//! them to a notification sink for the companion app. Also pushes text back
//! into a group on request.
//!
//! ## Architecture
//!
//! ```text
//! LINE → /webhook → signature → classify → Forwarder → NotificationSink
//! app  → /send    → PushDispatcher → Messaging API → LINE
//! ```

pub mod config;
pub mod error;
pub mod line;
pub mod notify;
pub mod relay;
pub mod service;
pub mod web;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use error::AppError;
pub use notify::{sink_from_config, NotificationSink};
pub use relay::{NormalizedMessage, SendRequest};
pub use service::BotService;
pub use web::{router, AppState};
