//! `MessagePusher` over an axum WebSocket.
//!
//! The UI layer splits the socket; the read half stays with the connection
//! handler and the write half is handed to this pusher, which the room hub
//! drives during fan-out.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, stream::SplitSink};
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher};

pub struct WebSocketPusher {
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketPusher {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketPusher {
    async fn push(&self, payload: &str) -> Result<(), MessagePushError> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(payload.to_owned().into()))
            .await
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }

    async fn close(&self) {
        let mut sink = self.sink.lock().await;
        // The peer may already be gone
        if let Err(e) = sink.send(Message::Close(None)).await {
            tracing::debug!("Failed to send close frame: {}", e);
        }
        let _ = sink.close().await;
    }
}
