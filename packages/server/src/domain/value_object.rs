//! Value objects used across the server.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a room identifier in bytes.
pub const ROOM_ID_MAX_LEN: usize = 128;

/// Identifier of a persisted room.
///
/// Opaque to the server; it is the stable key shared between the room store
/// and the live hub registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        if value.len() > ROOM_ID_MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong(value.len()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates identifiers for newly created rooms.
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        RoomId::new(Uuid::new_v4().simple().to_string())
    }
}

/// Identity of one live socket. Unique per upgrade, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned identifier of a stored message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
