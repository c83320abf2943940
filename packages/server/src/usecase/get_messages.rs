//! UseCase: read a room's message history.

use std::sync::Arc;

use crate::domain::{MessageRepository, RoomId, RoomRepository, StoredMessage};

use super::error::ManageRoomsError;

pub struct GetMessagesUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            room_repository,
            message_repository,
        }
    }

    /// Stored messages of `room_id` in creation order.
    pub async fn execute(&self, room_id: &str) -> Result<Vec<StoredMessage>, ManageRoomsError> {
        let not_found = || ManageRoomsError::RoomNotFound(room_id.to_string());
        let id = RoomId::new(room_id.to_string()).map_err(|_| not_found())?;
        if self.room_repository.get_room(&id).await?.is_none() {
            return Err(not_found());
        }
        Ok(self.message_repository.get_messages(&id).await?)
    }
}
