//! Outbound side of a single live connection.

use async_trait::async_trait;

use super::MessagePushError;

/// Writes frames to one peer.
///
/// The WebSocket implementation lives in `infrastructure::message_pusher`;
/// hub tests use in-memory recorders.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Write one text frame to the peer
    async fn push(&self, payload: &str) -> Result<(), MessagePushError>;

    /// Close the underlying transport. Must tolerate being called more than once.
    async fn close(&self);
}
