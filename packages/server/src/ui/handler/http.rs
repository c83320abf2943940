//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::{
        http::{CreateRoomRequest, ErrorDto, HubSummaryDto, RoomSummaryDto},
        websocket::OutboundChatMessage,
    },
    ui::state::AppState,
    usecase::{ManageRoomsError, NewRoom},
};

fn error_response(e: ManageRoomsError) -> Response {
    let status = match &e {
        ManageRoomsError::InvalidName | ManageRoomsError::InvalidRoomId(_) => {
            StatusCode::BAD_REQUEST
        }
        ManageRoomsError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        ManageRoomsError::Repository(_) => {
            tracing::error!("Room store error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorDto::new(e.to_string()))).into_response()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Persisted rooms with their live connection counts
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Response {
    match state.manage_rooms_usecase.list().await {
        Ok(rooms) => {
            let summaries: Vec<RoomSummaryDto> = rooms
                .into_iter()
                .map(|entry| RoomSummaryDto::from_room(entry.room, entry.live_connections))
                .collect();
            Json(summaries).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Response {
    let new_room = NewRoom {
        name: request.name,
        description: request.description,
        creator: request.creator,
    };
    match state.manage_rooms_usecase.create(new_room).await {
        Ok(room) => (
            StatusCode::CREATED,
            Json(RoomSummaryDto::from_room(room, None)),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    match state.manage_rooms_usecase.delete(&room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Stored messages of a room in creation order
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Response {
    match state.get_messages_usecase.execute(&room_id).await {
        Ok(messages) => {
            let messages: Vec<OutboundChatMessage> =
                messages.into_iter().map(OutboundChatMessage::from).collect();
            Json(messages).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Live registry snapshot (for diagnostics and tests)
pub async fn debug_hubs(State(state): State<Arc<AppState>>) -> Json<Vec<HubSummaryDto>> {
    let hubs = state.manage_rooms_usecase.live_hubs().await;
    Json(hubs.into_iter().map(HubSummaryDto::from).collect())
}
