//! In-memory room store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

/// Room store held in process memory.
///
/// Listing order is creation time, then id, so reconcile logs are stable.
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rooms`. Later duplicates replace earlier ones.
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let rooms = rooms
            .into_iter()
            .map(|room| (room.id.clone(), room))
            .collect();
        Self {
            rooms: Mutex::new(rooms),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_all_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut rooms: Vec<Room> = rooms.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rooms)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.rooms.lock().await.get(room_id).cloned())
    }

    async fn create_room(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(room.id.to_string()));
        }
        rooms.insert(room.id.clone(), room.clone());
        tracing::debug!(room_id = %room.id, "Room stored");
        Ok(room)
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<bool, RepositoryError> {
        let removed = self.rooms.lock().await.remove(room_id).is_some();
        if removed {
            tracing::debug!(room_id = %room_id, "Room deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    fn room(id: &str, created_at: i64) -> Room {
        Room::new(
            RoomId::new(id.to_string()).unwrap(),
            format!("room {}", id),
            Timestamp::new(created_at),
        )
    }

    #[tokio::test]
    async fn test_get_all_rooms_orders_by_creation_time() {
        // テスト項目: ルーム一覧が作成日時順に返される
        // given (前提条件):
        let repository = InMemoryRoomRepository::with_rooms([room("b", 2), room("a", 2), room("c", 1)]);

        // when (操作):
        let rooms = repository.get_all_rooms().await.unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|room| room.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_create_room_rejects_duplicate_id() {
        // テスト項目: 重複する ID でのルーム作成は拒否される
        // given (前提条件):
        let repository = InMemoryRoomRepository::new();
        repository.create_room(room("r1", 0)).await.unwrap();

        // when (操作):
        let result = repository.create_room(room("r1", 1)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomAlreadyExists("r1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_delete_room_reports_whether_it_existed() {
        // テスト項目: ルーム削除で存在していたかどうかが返される
        // given (前提条件):
        let repository = InMemoryRoomRepository::with_rooms([room("r1", 0)]);
        let room_id = RoomId::new("r1".to_string()).unwrap();

        // when (操作):
        let first = repository.delete_room(&room_id).await.unwrap();
        let second = repository.delete_room(&room_id).await.unwrap();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(repository.get_room(&room_id).await.unwrap(), None);
    }
}
