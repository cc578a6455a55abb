//! LINE webhook callback types.
//!
//! Only the shapes the relay acts on are modelled in detail. Every other
//! event, source, or message kind lands in an explicit `Unknown` variant so
//! callers have to decide what to do with it.

use serde::Deserialize;

/// Header carrying the base64 HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Body of a webhook delivery: a batch of events for one bot.
#[derive(Debug, Clone, Deserialize)]
pub struct Callback {
    /// User ID of the bot that should receive the events
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum InboundEvent {
    #[serde(rename = "message")]
    Message(MessageEvent),
    /// follow, unfollow, join, leave, postback, ...
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub source: Source,
    pub message: MessageContent,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
    #[serde(default)]
    pub delivery_context: Option<DeliveryContext>,
    #[serde(default)]
    pub reply_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub is_redelivery: bool,
}

/// Where an event originated.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Source {
    #[serde(rename = "group", rename_all = "camelCase")]
    Group {
        group_id: String,
        /// Omitted by the platform for members who have not consented
        #[serde(default)]
        user_id: String,
    },
    #[serde(rename = "room", rename_all = "camelCase")]
    Room {
        room_id: String,
        #[serde(default)]
        user_id: String,
    },
    #[serde(rename = "user", rename_all = "camelCase")]
    User { user_id: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum MessageContent {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        id: String,
        text: String,
    },
    /// image, video, audio, file, location, sticker, ...
    #[serde(other)]
    Unknown,
}

impl MessageEvent {
    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .map(|c| c.is_redelivery)
            .unwrap_or(false)
    }
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Group { .. } => "group",
            Source::Room { .. } => "room",
            Source::User { .. } => "user",
            Source::Unknown => "unknown",
        }
    }
}
