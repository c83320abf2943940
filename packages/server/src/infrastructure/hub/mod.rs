//! Live room state.
//!
//! - `connection`: one registered socket
//! - `room_hub`: members of one room and the broadcaster draining its queue
//! - `registry`: room id to hub mapping, converged on the persisted room set

mod connection;
mod registry;
mod room_hub;
#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

pub use connection::Connection;
pub use registry::{ReconcileReport, RoomRegistry};
pub use room_hub::{Broadcaster, FanOutReport, HubError, RoomHub};

/// Tuning shared by every hub the registry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Capacity of each hub's inbound queue
    pub queue_capacity: usize,
    /// Upper bound on a single socket write during fan-out
    pub write_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            write_timeout: Duration::from_secs(5),
        }
    }
}

/// Snapshot of one live hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSummary {
    pub room_id: crate::domain::RoomId,
    pub members: usize,
}
