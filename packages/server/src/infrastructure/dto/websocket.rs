//! WebSocket frame payloads.

use serde::{Deserialize, Serialize};

/// Chat frame sent by a client.
///
/// Every field is optional on the wire; absent strings decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundChatMessage {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl InboundChatMessage {
    /// The carried credential, ignoring empty strings.
    pub fn credential(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Stored message as fanned out to every member of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundChatMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_id: String,
    pub username: String,
    pub user_id: String,
    pub content: String,
    /// RFC 3339, UTC
    pub created_at: String,
}
