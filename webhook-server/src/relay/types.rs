//! Normalized records passed between the relay stages.

use serde::{Deserialize, Serialize};

/// A group text message, reduced to what downstream consumers need.
///
/// Serialized with the field names the companion app already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub group_id: String,
    pub user_id: String,
    #[serde(rename = "user_name")]
    pub display_name: String,
    #[serde(rename = "message")]
    pub text: String,
    #[serde(rename = "timestamp")]
    pub timestamp_millis: i64,
}

impl NormalizedMessage {
    /// Build a message, or `None` if the group or text is empty.
    pub fn new(
        group_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
        timestamp_millis: i64,
    ) -> Option<Self> {
        let group_id = group_id.into();
        let text = text.into();
        if group_id.is_empty() || text.is_empty() {
            return None;
        }

        let user_id = user_id.into();
        Some(Self {
            display_name: display_name(&user_id),
            group_id,
            user_id,
            text,
            timestamp_millis,
        })
    }
}

/// Placeholder shown when the platform withholds the sender's id.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Number of id characters kept in a derived display name.
const DISPLAY_ID_CHARS: usize = 8;

/// Short display name for a sender: `User-` plus the first 8 characters.
pub fn display_name(user_id: &str) -> String {
    if user_id.is_empty() {
        return UNKNOWN_USER.to_string();
    }
    let prefix: String = user_id.chars().take(DISPLAY_ID_CHARS).collect();
    format!("User-{prefix}")
}

/// Outbound push request as decoded from `POST /send`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub group_id: String,
    #[serde(default, rename = "message")]
    pub text: String,
}
