//! UseCase: converge live hubs on the persisted room set.

use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};

use crate::domain::RoomRepository;
use crate::infrastructure::hub::{ReconcileReport, RoomRegistry};

use super::error::ReconcileError;

pub struct ReconcileRoomsUseCase {
    room_repository: Arc<dyn RoomRepository>,
    registry: Arc<RoomRegistry>,
    /// Held from fetch to apply so an older room list never lands last
    pass: Mutex<()>,
}

impl ReconcileRoomsUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>, registry: Arc<RoomRegistry>) -> Self {
        Self {
            room_repository,
            registry,
            pass: Mutex::new(()),
        }
    }

    /// Fetch every room and reconcile the registry against it.
    ///
    /// Passes run one at a time. A failed fetch leaves the registry untouched.
    pub async fn execute(&self) -> Result<ReconcileReport, ReconcileError> {
        let _pass = self.pass.lock().await;
        let rooms = self.room_repository.get_all_rooms().await.map_err(|e| {
            tracing::warn!("Failed to fetch rooms, keeping live hubs: {}", e);
            ReconcileError::FetchFailed(e)
        })?;
        Ok(self
            .registry
            .reconcile(rooms.into_iter().map(|room| room.id))
            .await)
    }

    /// Run [`Self::execute`] every `interval`, starting one interval from now.
    pub fn spawn_periodic(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Failures are logged in execute and retried next tick
                let _ = self.execute().await;
            }
        })
    }
}
