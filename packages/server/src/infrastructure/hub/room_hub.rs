//! Per-room hub: the live member set plus the broadcaster draining its queue.

use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{ConnectionId, MessagePushError, RoomId, StoredMessage};
use crate::infrastructure::dto::websocket::OutboundChatMessage;

use super::{Connection, HubConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("room hub '{0}' is closed")]
    Closed(String),
}

/// Items on a hub's inbound queue.
#[derive(Debug)]
pub(crate) enum HubEvent {
    Broadcast(StoredMessage),
    /// Teardown sentinel. Messages queued ahead of it are still delivered.
    Stop,
}

/// Outcome of fanning one message out to a room.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub pruned: usize,
}

#[derive(Default)]
struct Members {
    connections: HashMap<ConnectionId, Arc<Connection>>,
    /// Set on teardown; no registration is accepted afterwards
    closed: bool,
}

/// Live state of one room.
///
/// Members are mutated by the connection handler (register/unregister), by
/// the broadcaster (pruning failed peers) and by teardown, all through the
/// `members` lock. The lock is never held across a socket write.
pub struct RoomHub {
    id: RoomId,
    members: Mutex<Members>,
    inbound: mpsc::Sender<HubEvent>,
    accepting: AtomicBool,
    write_timeout: Duration,
}

impl RoomHub {
    /// Create a hub together with the broadcaster for its queue.
    ///
    /// The registry spawns the returned broadcaster; nothing else does.
    pub(crate) fn new(id: RoomId, config: &HubConfig) -> (Arc<Self>, Broadcaster) {
        let (inbound, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let hub = Arc::new(Self {
            id,
            members: Mutex::new(Members::default()),
            inbound,
            accepting: AtomicBool::new(true),
            write_timeout: config.write_timeout,
        });
        let broadcaster = Broadcaster {
            hub: hub.clone(),
            inbound: receiver,
        };
        (hub, broadcaster)
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Add a connection to the room. Fails once the hub has been torn down.
    pub async fn register(&self, connection: Arc<Connection>) -> Result<(), HubError> {
        let mut members = self.members.lock().await;
        if members.closed {
            return Err(HubError::Closed(self.id.to_string()));
        }
        let connection_id = connection.id();
        members.connections.insert(connection_id, connection);
        tracing::info!(
            room_id = %self.id,
            connection_id = %connection_id,
            members = members.connections.len(),
            "Connection registered"
        );
        Ok(())
    }

    /// Remove a connection. Returns `false` if it was not a member.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        let mut members = self.members.lock().await;
        let removed = members.connections.remove(&connection_id).is_some();
        if removed {
            tracing::info!(
                room_id = %self.id,
                connection_id = %connection_id,
                members = members.connections.len(),
                "Connection unregistered"
            );
        }
        removed
    }

    pub async fn contains(&self, connection_id: ConnectionId) -> bool {
        self.members
            .lock()
            .await
            .connections
            .contains_key(&connection_id)
    }

    pub async fn member_count(&self) -> usize {
        self.members.lock().await.connections.len()
    }

    /// Queue a stored message for broadcast.
    ///
    /// Waits for queue space while the hub is live; fails fast once it has
    /// stopped accepting or its broadcaster is gone.
    pub async fn enqueue(&self, message: StoredMessage) -> Result<(), HubError> {
        if !self.accepting.load(Ordering::Acquire) {
            return Err(HubError::Closed(self.id.to_string()));
        }
        self.inbound
            .send(HubEvent::Broadcast(message))
            .await
            .map_err(|_| HubError::Closed(self.id.to_string()))
    }

    /// Stop accepting messages and deliver the stop sentinel to the broadcaster.
    pub(crate) async fn stop(&self) {
        self.accepting.store(false, Ordering::Release);
        if self.inbound.send(HubEvent::Stop).await.is_err() {
            tracing::debug!(room_id = %self.id, "Broadcaster already gone");
        }
    }

    /// Mark the hub closed and force-close every remaining member.
    ///
    /// Returns the number of connections closed.
    pub(crate) async fn close_members(&self) -> usize {
        let drained: Vec<Arc<Connection>> = {
            let mut members = self.members.lock().await;
            members.closed = true;
            members
                .connections
                .drain()
                .map(|(_, connection)| connection)
                .collect()
        };
        self.close_connections(&drained).await;
        drained.len()
    }

    /// Close `connections`, giving each transport at most the write timeout.
    ///
    /// A close that runs out of time still marks the connection closed, so its
    /// read loop ends and the socket is dropped with it.
    async fn close_connections(&self, connections: &[Arc<Connection>]) {
        let write_timeout = self.write_timeout;
        join_all(connections.iter().map(|connection| async move {
            if tokio::time::timeout(write_timeout, connection.close())
                .await
                .is_err()
            {
                tracing::warn!(
                    room_id = %self.id,
                    connection_id = %connection.id(),
                    "Close handshake timed out, dropping connection"
                );
            }
        }))
        .await;
    }

    /// Write one message to every current member, pruning the ones that fail.
    pub(crate) async fn fan_out(&self, message: &StoredMessage) -> FanOutReport {
        let payload = match serde_json::to_string(&OutboundChatMessage::from(message)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(room_id = %self.id, "Failed to serialize message: {}", e);
                return FanOutReport::default();
            }
        };

        let targets: Vec<Arc<Connection>> = {
            let members = self.members.lock().await;
            members.connections.values().cloned().collect()
        };

        let payload = payload.as_str();
        let write_timeout = self.write_timeout;
        let results = join_all(targets.iter().map(|connection| async move {
            match tokio::time::timeout(write_timeout, connection.push(payload)).await {
                Ok(result) => result,
                Err(_) => Err(MessagePushError::Timeout),
            }
        }))
        .await;

        let mut failed: Vec<Arc<Connection>> = Vec::new();
        for (connection, result) in targets.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(
                    room_id = %self.id,
                    connection_id = %connection.id(),
                    "Failed to push message, pruning connection: {}",
                    e
                );
                failed.push(connection.clone());
            }
        }

        if !failed.is_empty() {
            self.close_connections(&failed).await;
            let mut members = self.members.lock().await;
            for connection in &failed {
                members.connections.remove(&connection.id());
            }
        }

        FanOutReport {
            delivered: targets.len() - failed.len(),
            pruned: failed.len(),
        }
    }
}

/// Sole consumer of a hub's inbound queue.
pub struct Broadcaster {
    hub: Arc<RoomHub>,
    inbound: mpsc::Receiver<HubEvent>,
}

impl Broadcaster {
    /// Fan out queued messages in order until the stop sentinel arrives.
    pub async fn run(mut self) {
        tracing::debug!(room_id = %self.hub.id, "Broadcaster started");
        while let Some(event) = self.inbound.recv().await {
            match event {
                HubEvent::Broadcast(message) => {
                    let report = self.hub.fan_out(&message).await;
                    tracing::debug!(
                        room_id = %self.hub.id,
                        message_id = message.id.as_str(),
                        delivered = report.delivered,
                        pruned = report.pruned,
                        "Broadcasted message"
                    );
                }
                HubEvent::Stop => break,
            }
        }
        tracing::debug!(room_id = %self.hub.id, "Broadcaster stopped");
    }
}
