//! UseCase: join a room's live hub.
//!
//! Split in two steps so the UI layer can reject an unknown room before the
//! protocol upgrade and register the socket after it.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId};
use crate::infrastructure::hub::{Connection, RoomHub, RoomRegistry};

use super::error::JoinRoomError;

pub struct JoinRoomUseCase {
    registry: Arc<RoomRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve the live hub of `room_id`. Never creates one.
    pub async fn find_room(&self, room_id: &str) -> Result<Arc<RoomHub>, JoinRoomError> {
        let not_found = || JoinRoomError::RoomNotFound(room_id.to_string());
        let room_id = RoomId::new(room_id.to_string()).map_err(|_| not_found())?;
        self.registry.lookup(&room_id).await.ok_or_else(not_found)
    }

    /// Register a new connection writing through `pusher`.
    ///
    /// If the hub was torn down in the meantime the transport is closed and
    /// `RoomClosed` is returned.
    pub async fn execute(
        &self,
        hub: &RoomHub,
        pusher: Box<dyn MessagePusher>,
    ) -> Result<Arc<Connection>, JoinRoomError> {
        let connection = Arc::new(Connection::new(hub.id().clone(), pusher));
        if let Err(e) = hub.register(connection.clone()).await {
            tracing::warn!(connection_id = %connection.id(), "Rejected connection: {}", e);
            connection.close().await;
            return Err(JoinRoomError::RoomClosed(hub.id().to_string()));
        }
        Ok(connection)
    }
}
