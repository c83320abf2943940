//! Domain entities.

use super::value_object::{MessageId, RoomId, Timestamp};

/// A persisted chat room as known to the room store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    pub creator: String,
    /// User ids on the room roster
    pub members: Vec<String>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, name: String, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            creator: String::new(),
            members: Vec::new(),
            created_at,
        }
    }
}

/// A chat message as submitted by a connection, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub room_id: RoomId,
    pub username: String,
    pub user_id: String,
    pub content: String,
}

/// The durable record returned by the message store. This is what gets broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub username: String,
    pub user_id: String,
    pub content: String,
    pub created_at: Timestamp,
}

impl StoredMessage {
    pub fn from_draft(draft: MessageDraft, id: MessageId, created_at: Timestamp) -> Self {
        Self {
            id,
            room_id: draft.room_id,
            username: draft.username,
            user_id: draft.user_id,
            content: draft.content,
            created_at,
        }
    }
}

/// Identity claims extracted from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: String,
    pub username: String,
}
