//! Store interfaces the server depends on.
//!
//! The use cases depend on these traits only; `infrastructure` provides the
//! concrete stores.

use async_trait::async_trait;

use super::{MessageDraft, RepositoryError, Room, RoomId, StoredMessage};

/// Persisted room roster.
///
/// Consulted by the reconciler; the live registry never owns this data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Every room currently in the store
    async fn get_all_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// A single room, `None` when absent
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// Insert a new room
    async fn create_room(&self, room: Room) -> Result<Room, RepositoryError>;

    /// Delete a room. Returns `false` when the room did not exist.
    async fn delete_room(&self, room_id: &RoomId) -> Result<bool, RepositoryError>;
}

/// Durable message log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message and return the canonical record with server id and timestamp
    async fn create_message(&self, draft: MessageDraft) -> Result<StoredMessage, RepositoryError>;

    /// Messages of a room in creation order
    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<StoredMessage>, RepositoryError>;
}
