//! WebSocket connection handler.
//!
//! Lifecycle of one socket: room lookup (before the upgrade), registration,
//! read loop, then a single cleanup path that unregisters and closes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::stream::{SplitStream, StreamExt};

use crate::{
    infrastructure::{
        dto::{
            http::{ConnectQuery, ErrorDto},
            websocket::InboundChatMessage,
        },
        hub::{Connection, RoomHub},
        message_pusher::WebSocketPusher,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Response {
    let room_id = query.id.unwrap_or_default();

    let hub = match state.join_room_usecase.find_room(&room_id).await {
        Ok(hub) => hub,
        Err(e) => {
            tracing::warn!("Rejected WebSocket upgrade: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto::new("Room not found")),
            )
                .into_response();
        }
    };

    ws.on_failed_upgrade(|e| tracing::debug!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state, hub))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, hub: Arc<RoomHub>) {
    let (sender, mut receiver) = socket.split();

    let connection = match state
        .join_room_usecase
        .execute(&hub, Box::new(WebSocketPusher::new(sender)))
        .await
    {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Failed to join room: {}", e);
            return;
        }
    };

    read_loop(&state, &hub, &connection, &mut receiver).await;

    state.leave_room_usecase.execute(&hub, &connection).await;
    tracing::info!(
        room_id = %hub.id(),
        connection_id = %connection.id(),
        "Connection finished"
    );
}

/// Read frames until the peer leaves, a frame is rejected, or the hub closes us.
async fn read_loop(
    state: &AppState,
    hub: &RoomHub,
    connection: &Connection,
    receiver: &mut SplitStream<WebSocket>,
) {
    loop {
        let frame = tokio::select! {
            frame = receiver.next() => frame,
            _ = connection.closed() => {
                tracing::debug!(connection_id = %connection.id(), "Closed by hub");
                return;
            }
        };

        let message = match frame {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                tracing::debug!(connection_id = %connection.id(), "WebSocket error: {}", e);
                return;
            }
            None => return,
        };

        let decoded = match message {
            Message::Text(text) => serde_json::from_str::<InboundChatMessage>(text.as_str()),
            Message::Binary(bytes) => serde_json::from_slice::<InboundChatMessage>(&bytes),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(_) => {
                tracing::debug!(connection_id = %connection.id(), "Peer requested close");
                return;
            }
        };

        let inbound = match decoded {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!(connection_id = %connection.id(), "Malformed frame: {}", e);
                return;
            }
        };

        if let Err(e) = state
            .send_message_usecase
            .execute(hub, connection, inbound.into())
            .await
        {
            tracing::warn!(
                room_id = %hub.id(),
                connection_id = %connection.id(),
                "Dropping connection: {}",
                e
            );
            return;
        }
    }
}
