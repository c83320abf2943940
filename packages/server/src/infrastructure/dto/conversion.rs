//! Conversion logic between DTOs and domain entities.

use agora_shared::time::timestamp_to_rfc3339;

use crate::domain::{Room, StoredMessage};
use crate::infrastructure::dto::{http, websocket};
use crate::infrastructure::hub::HubSummary;
use crate::usecase::ChatSubmission;

// ========================================
// DTO → Domain input
// ========================================

impl From<websocket::InboundChatMessage> for ChatSubmission {
    fn from(dto: websocket::InboundChatMessage) -> Self {
        let token = dto.credential().map(str::to_string);
        Self {
            room_id: dto.room_id,
            username: dto.username,
            user_id: dto.user_id,
            content: dto.message,
            token,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<StoredMessage> for websocket::OutboundChatMessage {
    fn from(model: StoredMessage) -> Self {
        Self {
            id: model.id.into_string(),
            room_id: model.room_id.into_string(),
            username: model.username,
            user_id: model.user_id,
            content: model.content,
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<&StoredMessage> for websocket::OutboundChatMessage {
    fn from(model: &StoredMessage) -> Self {
        Self::from(model.clone())
    }
}

impl From<HubSummary> for http::HubSummaryDto {
    fn from(summary: HubSummary) -> Self {
        Self {
            room_id: summary.room_id.into_string(),
            members: summary.members,
        }
    }
}

impl http::RoomSummaryDto {
    pub fn from_room(room: Room, live_connections: Option<usize>) -> Self {
        Self {
            id: room.id.into_string(),
            name: room.name,
            description: room.description,
            creator: room.creator,
            members: room.members,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            live_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, RoomId, Timestamp};

    #[test]
    fn test_stored_message_to_outbound() {
        // テスト項目: 保存済みメッセージが送信 DTO に変換される
        // given (前提条件):
        let stored = StoredMessage {
            id: MessageId::generate(),
            room_id: RoomId::new("r1".to_string()).unwrap(),
            username: "alice".to_string(),
            user_id: "u1".to_string(),
            content: "hi".to_string(),
            created_at: Timestamp::new(1672531200000),
        };

        // when (操作):
        let dto = websocket::OutboundChatMessage::from(&stored);

        // then (期待する結果):
        assert_eq!(dto.id, stored.id.as_str());
        assert_eq!(dto.room_id, "r1");
        assert_eq!(dto.content, "hi");
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_inbound_to_submission_drops_blank_token() {
        // テスト項目: 受信 DTO から送信内容への変換で空白のトークンが除外される
        // given (前提条件):
        let dto = websocket::InboundChatMessage {
            room_id: "r1".to_string(),
            username: "alice".to_string(),
            user_id: "u1".to_string(),
            message: "hi".to_string(),
            token: Some("   ".to_string()),
        };

        // when (操作):
        let submission = ChatSubmission::from(dto);

        // then (期待する結果):
        assert_eq!(submission.content, "hi");
        assert_eq!(submission.token, None);
    }

    #[test]
    fn test_room_to_summary() {
        // テスト項目: ルームがサマリー DTO に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("r1".to_string()).unwrap(),
            "general".to_string(),
            Timestamp::new(0),
        );
        room.members.push("u1".to_string());

        // when (操作):
        let dto = http::RoomSummaryDto::from_room(room, Some(2));

        // then (期待する結果):
        assert_eq!(dto.id, "r1");
        assert_eq!(dto.name, "general");
        assert_eq!(dto.members, vec!["u1".to_string()]);
        assert_eq!(dto.live_connections, Some(2));
    }
}
