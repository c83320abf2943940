//! Handle to one live socket registered with a room hub.

use tokio::sync::{RwLock, watch};

use crate::domain::{AuthClaims, ConnectionId, MessagePushError, MessagePusher, RoomId};

/// A live connection.
///
/// The hub owns a set of these; the read loop of the socket keeps its own
/// `Arc` and watches [`Connection::closed`] so a forced close from the hub or
/// the broadcaster ends the loop.
pub struct Connection {
    id: ConnectionId,
    room_id: RoomId,
    pusher: Box<dyn MessagePusher>,
    /// Populated lazily from the first verified credential
    identity: RwLock<Option<AuthClaims>>,
    closed: watch::Sender<bool>,
}

impl Connection {
    pub fn new(room_id: RoomId, pusher: Box<dyn MessagePusher>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            id: ConnectionId::generate(),
            room_id,
            pusher,
            identity: RwLock::new(None),
            closed,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Write one frame. Fails without touching the transport once closed.
    pub async fn push(&self, payload: &str) -> Result<(), MessagePushError> {
        if self.is_closed() {
            return Err(MessagePushError::Closed);
        }
        self.pusher.push(payload).await
    }

    /// Close the transport. Only the first call reaches the pusher.
    pub async fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }
        self.pusher.close().await;
        tracing::debug!(
            connection_id = %self.id,
            room_id = %self.room_id,
            "Connection closed"
        );
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolves once the connection has been closed.
    pub async fn closed(&self) {
        let mut receiver = self.closed.subscribe();
        // The sender lives as long as `self`, so this only returns on close.
        let _ = receiver.wait_for(|closed| *closed).await;
    }

    pub async fn set_identity(&self, claims: AuthClaims) {
        *self.identity.write().await = Some(claims);
    }

    pub async fn identity(&self) -> Option<AuthClaims> {
        self.identity.read().await.clone()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("room_id", &self.room_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
