//! In-memory pushers for hub tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    MessageId, MessagePushError, MessagePusher, RoomId, StoredMessage, Timestamp,
};

/// Records every frame it receives. Can be switched to fail or to stall.
#[derive(Clone, Default)]
pub struct RecordingPusher {
    frames: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    stall: Option<Duration>,
    close_stall: Option<Duration>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pusher whose writes always fail
    pub fn failing() -> Self {
        let pusher = Self::default();
        pusher.failing.store(true, Ordering::SeqCst);
        pusher
    }

    /// A pusher whose writes take `delay` before succeeding
    pub fn stalled(delay: Duration) -> Self {
        Self {
            stall: Some(delay),
            ..Self::default()
        }
    }

    /// A peer that stopped reading: writes and the close handshake both stall
    pub fn hanging() -> Self {
        Self {
            stall: Some(Duration::from_secs(60)),
            close_stall: Some(Duration::from_secs(60)),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    /// Frames decoded as JSON values
    pub fn json_frames(&self) -> Vec<serde_json::Value> {
        self.frames()
            .iter()
            .map(|frame| serde_json::from_str(frame).unwrap())
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn push(&self, payload: &str) -> Result<(), MessagePushError> {
        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MessagePushError::PushFailed("broken pipe".to_string()));
        }
        self.frames.lock().unwrap().push(payload.to_string());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.close_stall {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Stored message in `room_id` with fixed sender fields.
pub fn stored_message(room_id: &str, content: &str) -> StoredMessage {
    StoredMessage {
        id: MessageId::generate(),
        room_id: RoomId::new(room_id.to_string()).unwrap(),
        username: "alice".to_string(),
        user_id: "u1".to_string(),
        content: content.to_string(),
        created_at: Timestamp::new(1672531200000),
    }
}

/// Poll `condition` until it holds, panicking after two seconds.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
