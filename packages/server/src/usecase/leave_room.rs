//! UseCase: leave a room.

use crate::infrastructure::hub::{Connection, RoomHub};

/// Removes a connection from its hub and closes its transport.
///
/// Safe to run after the hub already pruned or force-closed the connection.
#[derive(Default)]
pub struct LeaveRoomUseCase;

impl LeaveRoomUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` if the connection was still a member.
    pub async fn execute(&self, hub: &RoomHub, connection: &Connection) -> bool {
        let was_member = hub.unregister(connection.id()).await;
        connection.close().await;
        was_member
    }
}
