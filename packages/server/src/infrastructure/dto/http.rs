//! HTTP API payloads.

use serde::{Deserialize, Serialize};

/// Query parameters of the WebSocket upgrade endpoint
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Target room id
    pub id: Option<String>,
}

/// Persisted room with its live connection count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub creator: String,
    pub members: Vec<String>,
    pub created_at: String,
    /// `None` when the room has no live hub yet
    pub live_connections: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator: String,
}

/// Live hub as seen by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSummaryDto {
    pub room_id: String,
    pub members: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

impl ErrorDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
