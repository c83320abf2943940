//! In-memory message store.

use std::collections::HashMap;
use std::sync::Arc;

use agora_shared::time::Clock;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    MessageDraft, MessageId, MessageRepository, RepositoryError, RoomId, RoomRepository,
    StoredMessage, Timestamp,
};

/// Message log held in process memory, keyed by room.
///
/// Messages for rooms unknown to the room store are refused.
pub struct InMemoryMessageRepository {
    messages: Mutex<HashMap<RoomId, Vec<StoredMessage>>>,
    room_repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    pub fn new(room_repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            room_repository,
            clock,
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create_message(&self, draft: MessageDraft) -> Result<StoredMessage, RepositoryError> {
        if self.room_repository.get_room(&draft.room_id).await?.is_none() {
            return Err(RepositoryError::RoomNotFound(draft.room_id.to_string()));
        }

        let stored = StoredMessage::from_draft(
            draft,
            MessageId::generate(),
            Timestamp::new(self.clock.now_millis()),
        );
        self.messages
            .lock()
            .await
            .entry(stored.room_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn get_messages(&self, room_id: &RoomId) -> Result<Vec<StoredMessage>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .await
            .get(room_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Room;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use agora_shared::time::FixedClock;

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn create_test_repository() -> InMemoryMessageRepository {
        let rooms = InMemoryRoomRepository::with_rooms([Room::new(
            room_id("r1"),
            "general".to_string(),
            Timestamp::new(0),
        )]);
        InMemoryMessageRepository::new(Arc::new(rooms), Arc::new(FixedClock::new(1_000)))
    }

    fn draft(room: &str, content: &str) -> MessageDraft {
        MessageDraft {
            room_id: room_id(room),
            username: "alice".to_string(),
            user_id: "u1".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_message_assigns_id_and_timestamp() {
        // テスト項目: メッセージ保存時に ID とタイムスタンプが付与される
        // given (前提条件):
        let repository = create_test_repository();

        // when (操作):
        let stored = repository.create_message(draft("r1", "hi")).await.unwrap();

        // then (期待する結果):
        assert!(!stored.id.as_str().is_empty());
        assert_eq!(stored.created_at, Timestamp::new(1_000));
        assert_eq!(stored.content, "hi");
        assert_eq!(
            repository.get_messages(&room_id("r1")).await.unwrap(),
            vec![stored]
        );
    }

    #[tokio::test]
    async fn test_create_message_in_unknown_room_fails() {
        // テスト項目: 存在しないルームへのメッセージ保存は失敗する
        // given (前提条件):
        let repository = create_test_repository();

        // when (操作):
        let result = repository.create_message(draft("ghost", "hi")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::RoomNotFound("ghost".to_string())));
        assert!(repository.get_messages(&room_id("ghost")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_messages_keeps_creation_order() {
        // テスト項目: メッセージ履歴が作成順に返される
        // given (前提条件):
        let repository = create_test_repository();
        for content in ["one", "two", "three"] {
            repository.create_message(draft("r1", content)).await.unwrap();
        }

        // when (操作):
        let messages = repository.get_messages(&room_id("r1")).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }
}
