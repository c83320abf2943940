//! UseCase: room administration over HTTP.
//!
//! Every mutation is followed by an immediate reconcile so live hubs appear
//! (or are torn down) without waiting for the periodic pass.

use std::sync::Arc;

use agora_shared::time::Clock;

use crate::domain::{Room, RoomId, RoomIdFactory, RoomRepository, Timestamp};
use crate::infrastructure::hub::{HubSummary, RoomRegistry};

use super::{error::ManageRoomsError, reconcile_rooms::ReconcileRoomsUseCase};

/// Input of [`ManageRoomsUseCase::create`].
#[derive(Debug, Clone, Default)]
pub struct NewRoom {
    pub name: String,
    pub description: String,
    pub creator: String,
}

/// A persisted room and its live connection count, if it has a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomWithPresence {
    pub room: Room,
    pub live_connections: Option<usize>,
}

pub struct ManageRoomsUseCase {
    room_repository: Arc<dyn RoomRepository>,
    registry: Arc<RoomRegistry>,
    reconciler: Arc<ReconcileRoomsUseCase>,
    clock: Arc<dyn Clock>,
}

impl ManageRoomsUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        registry: Arc<RoomRegistry>,
        reconciler: Arc<ReconcileRoomsUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            registry,
            reconciler,
            clock,
        }
    }

    pub async fn list(&self) -> Result<Vec<RoomWithPresence>, ManageRoomsError> {
        let rooms = self.room_repository.get_all_rooms().await?;
        let mut listed = Vec::with_capacity(rooms.len());
        for room in rooms {
            let live_connections = match self.registry.lookup(&room.id).await {
                Some(hub) => Some(hub.member_count().await),
                None => None,
            };
            listed.push(RoomWithPresence {
                room,
                live_connections,
            });
        }
        Ok(listed)
    }

    pub async fn create(&self, new_room: NewRoom) -> Result<Room, ManageRoomsError> {
        let name = new_room.name.trim();
        if name.is_empty() {
            return Err(ManageRoomsError::InvalidName);
        }

        let mut room = Room::new(
            RoomIdFactory::generate()?,
            name.to_string(),
            Timestamp::new(self.clock.now_millis()),
        );
        room.description = new_room.description;
        if !new_room.creator.is_empty() {
            room.members.push(new_room.creator.clone());
        }
        room.creator = new_room.creator;

        let room = self.room_repository.create_room(room).await?;
        tracing::info!(room_id = %room.id, name = %room.name, "Room created");
        self.refresh().await;
        Ok(room)
    }

    pub async fn delete(&self, room_id: &str) -> Result<(), ManageRoomsError> {
        let not_found = || ManageRoomsError::RoomNotFound(room_id.to_string());
        let id = RoomId::new(room_id.to_string()).map_err(|_| not_found())?;
        if !self.room_repository.delete_room(&id).await? {
            return Err(not_found());
        }
        tracing::info!(room_id = %id, "Room deleted");
        self.refresh().await;
        Ok(())
    }

    /// Live registry snapshot for diagnostics.
    pub async fn live_hubs(&self) -> Vec<HubSummary> {
        self.registry.summaries().await
    }

    async fn refresh(&self) {
        // A failed fetch is already logged; the periodic pass retries
        let _ = self.reconciler.execute().await;
    }
}
