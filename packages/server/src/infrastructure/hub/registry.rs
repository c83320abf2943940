//! Room id to hub mapping.
//!
//! The registry only ever changes through [`RoomRegistry::reconcile`], which
//! converges the live hub set on the authoritative room list: hubs are created
//! for new rooms and torn down for rooms that disappeared. Teardown runs
//! outside the map lock so lookups never wait on a socket.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::RoomId;

use super::{HubConfig, HubSummary, RoomHub};

struct HubEntry {
    hub: Arc<RoomHub>,
    broadcaster: JoinHandle<()>,
}

/// Room ids touched by one reconcile pass, sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<RoomId>,
    pub retired: Vec<RoomId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.retired.is_empty()
    }
}

pub struct RoomRegistry {
    hubs: Mutex<HashMap<RoomId, HubEntry>>,
    config: HubConfig,
}

impl RoomRegistry {
    pub fn new(config: HubConfig) -> Self {
        Self {
            hubs: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub async fn lookup(&self, room_id: &RoomId) -> Option<Arc<RoomHub>> {
        self.hubs
            .lock()
            .await
            .get(room_id)
            .map(|entry| entry.hub.clone())
    }

    /// Converge the live hubs on `rooms`.
    ///
    /// Must be called from within a tokio runtime: new broadcasters are spawned.
    pub async fn reconcile<I>(&self, rooms: I) -> ReconcileReport
    where
        I: IntoIterator<Item = RoomId>,
    {
        let wanted: HashSet<RoomId> = rooms.into_iter().collect();
        let mut report = ReconcileReport::default();

        let retiring: Vec<(RoomId, HubEntry)> = {
            let mut hubs = self.hubs.lock().await;

            for room_id in &wanted {
                if hubs.contains_key(room_id) {
                    continue;
                }
                let (hub, broadcaster) = RoomHub::new(room_id.clone(), &self.config);
                let broadcaster = tokio::spawn(broadcaster.run());
                hubs.insert(room_id.clone(), HubEntry { hub, broadcaster });
                report.created.push(room_id.clone());
            }

            let stale: Vec<RoomId> = hubs
                .keys()
                .filter(|room_id| !wanted.contains(*room_id))
                .cloned()
                .collect();
            stale
                .into_iter()
                .filter_map(|room_id| hubs.remove(&room_id).map(|entry| (room_id, entry)))
                .collect()
        };

        report.retired = retiring.iter().map(|(room_id, _)| room_id.clone()).collect();
        join_all(retiring.into_iter().map(|(_, entry)| retire(entry))).await;

        report.created.sort();
        report.retired.sort();
        if !report.is_empty() {
            tracing::info!(
                created = ?report.created.iter().map(RoomId::as_str).collect::<Vec<_>>(),
                retired = ?report.retired.iter().map(RoomId::as_str).collect::<Vec<_>>(),
                "Reconciled room hubs"
            );
        }
        report
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        let mut room_ids: Vec<RoomId> = self.hubs.lock().await.keys().cloned().collect();
        room_ids.sort();
        room_ids
    }

    /// Live hubs with their member counts, sorted by room id.
    pub async fn summaries(&self) -> Vec<HubSummary> {
        let hubs: Vec<Arc<RoomHub>> = self
            .hubs
            .lock()
            .await
            .values()
            .map(|entry| entry.hub.clone())
            .collect();

        let mut summaries = Vec::with_capacity(hubs.len());
        for hub in hubs {
            summaries.push(HubSummary {
                room_id: hub.id().clone(),
                members: hub.member_count().await,
            });
        }
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    /// Tear down every hub.
    pub async fn shutdown(&self) {
        let entries: Vec<HubEntry> = {
            let mut hubs = self.hubs.lock().await;
            hubs.drain().map(|(_, entry)| entry).collect()
        };
        let count = entries.len();
        join_all(entries.into_iter().map(retire)).await;
        tracing::info!(hubs = count, "Room registry shut down");
    }
}

/// Stop a hub's broadcaster, wait for it to drain, then close its members.
async fn retire(entry: HubEntry) {
    let HubEntry { hub, broadcaster } = entry;
    hub.stop().await;
    if let Err(e) = broadcaster.await {
        tracing::warn!(room_id = %hub.id(), "Broadcaster task failed: {}", e);
    }
    let closed = hub.close_members().await;
    tracing::info!(room_id = %hub.id(), closed, "Room hub retired");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::hub::{
        Connection, HubError,
        testing::{RecordingPusher, eventually, stored_message},
    };

    fn ids(values: &[&str]) -> Vec<RoomId> {
        values
            .iter()
            .map(|value| RoomId::new(value.to_string()).unwrap())
            .collect()
    }

    fn registry() -> RoomRegistry {
        RoomRegistry::new(HubConfig {
            queue_capacity: 8,
            write_timeout: Duration::from_millis(100),
        })
    }

    async fn join(registry: &RoomRegistry, room: &str, pusher: &RecordingPusher) -> Arc<Connection> {
        let room_id = RoomId::new(room.to_string()).unwrap();
        let hub = registry.lookup(&room_id).await.unwrap();
        let connection = Arc::new(Connection::new(room_id, Box::new(pusher.clone())));
        hub.register(connection.clone()).await.unwrap();
        connection
    }

    #[tokio::test]
    async fn test_reconcile_converges_on_room_list() {
        // テスト項目: リコンサイルでハブの集合がルーム一覧と一致する
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1", "r2"])).await;

        // when (操作):
        let report = registry.reconcile(ids(&["r2", "r3"])).await;

        // then (期待する結果):
        assert_eq!(report.created, ids(&["r3"]));
        assert_eq!(report.retired, ids(&["r1"]));
        assert_eq!(registry.room_ids().await, ids(&["r2", "r3"]));
    }

    #[tokio::test]
    async fn test_reconcile_with_same_list_is_a_no_op() {
        // テスト項目: 同じルーム一覧でのリコンサイルは既存のハブを維持する
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1"])).await;
        let before = registry.lookup(&ids(&["r1"])[0]).await.unwrap();

        // when (操作):
        let report = registry.reconcile(ids(&["r1"])).await;

        // then (期待する結果): the existing hub is kept
        assert!(report.is_empty());
        let after = registry.lookup(&ids(&["r1"])[0]).await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_removed_room_force_closes_members() {
        // テスト項目: 一覧から消えたルームのメンバーは強制的に閉じられる
        // given (前提条件): two members in r2
        let registry = registry();
        registry.reconcile(ids(&["r1", "r2"])).await;
        let first = RecordingPusher::new();
        let second = RecordingPusher::new();
        let c1 = join(&registry, "r2", &first).await;
        let c2 = join(&registry, "r2", &second).await;
        let stale_hub = registry.lookup(&ids(&["r2"])[0]).await.unwrap();

        // when (操作): r2 disappears from the room list
        let report = registry.reconcile(ids(&["r1"])).await;

        // then (期待する結果):
        assert_eq!(report.retired, ids(&["r2"]));
        assert!(c1.is_closed());
        assert!(c2.is_closed());
        assert_eq!(first.close_count(), 1);
        assert_eq!(second.close_count(), 1);
        assert!(registry.lookup(&ids(&["r2"])[0]).await.is_none());
        assert_eq!(
            stale_hub.enqueue(stored_message("r2", "late")).await,
            Err(HubError::Closed("r2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_retire_delivers_queued_messages_before_closing() {
        // テスト項目: ハブの廃止時はキュー内のメッセージを配信してから接続を閉じる
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1"])).await;
        let pusher = RecordingPusher::new();
        let connection = join(&registry, "r1", &pusher).await;
        let hub = registry.lookup(&ids(&["r1"])[0]).await.unwrap();
        hub.enqueue(stored_message("r1", "last words")).await.unwrap();

        // when (操作):
        registry.reconcile(Vec::new()).await;

        // then (期待する結果):
        assert_eq!(pusher.frames().len(), 1);
        assert!(connection.is_closed());
    }

    #[tokio::test]
    async fn test_retire_completes_with_a_hung_member() {
        // テスト項目: 応答しないメンバーがいてもハブの廃止が完了する
        // given (前提条件): a member of r1 that stopped reading, with a message in flight
        let registry = registry();
        registry.reconcile(ids(&["r1"])).await;
        let connection = join(&registry, "r1", &RecordingPusher::hanging()).await;
        let hub = registry.lookup(&ids(&["r1"])[0]).await.unwrap();
        hub.enqueue(stored_message("r1", "hi")).await.unwrap();

        // when (操作):
        let report = tokio::time::timeout(Duration::from_secs(2), registry.reconcile(Vec::new()))
            .await
            .expect("retiring r1 should not wait on a hung peer");

        // then (期待する結果):
        assert_eq!(report.retired, ids(&["r1"]));
        assert!(connection.is_closed());
    }

    #[tokio::test]
    async fn test_lookup_unknown_room_creates_nothing() {
        // テスト項目: 未知のルームを参照してもハブは作成されない
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1"])).await;

        // when (操作):
        let hub = registry.lookup(&ids(&["ghost"])[0]).await;

        // then (期待する結果):
        assert!(hub.is_none());
        assert_eq!(registry.room_ids().await, ids(&["r1"]));
    }

    #[tokio::test]
    async fn test_summaries_report_member_counts() {
        // テスト項目: サマリーにルームごとのメンバー数が含まれる
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r2", "r1"])).await;
        join(&registry, "r1", &RecordingPusher::new()).await;
        join(&registry, "r1", &RecordingPusher::new()).await;

        // when (操作):
        let summaries = registry.summaries().await;

        // then (期待する結果):
        assert_eq!(
            summaries,
            vec![
                HubSummary { room_id: ids(&["r1"])[0].clone(), members: 2 },
                HubSummary { room_id: ids(&["r2"])[0].clone(), members: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_messages_stay_in_their_room() {
        // テスト項目: メッセージは送信されたルームの外には届かない
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1", "r2"])).await;
        let in_r1 = RecordingPusher::new();
        let in_r2 = RecordingPusher::new();
        join(&registry, "r1", &in_r1).await;
        join(&registry, "r2", &in_r2).await;

        // when (操作):
        let hub = registry.lookup(&ids(&["r1"])[0]).await.unwrap();
        hub.enqueue(stored_message("r1", "hi")).await.unwrap();

        // then (期待する結果):
        eventually(|| in_r1.frames().len() == 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(in_r2.frames().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        // テスト項目: シャットダウンで全てのハブと接続が閉じられる
        // given (前提条件):
        let registry = registry();
        registry.reconcile(ids(&["r1", "r2"])).await;
        let connection = join(&registry, "r1", &RecordingPusher::new()).await;

        // when (操作):
        registry.shutdown().await;

        // then (期待する結果):
        assert!(connection.is_closed());
        assert!(registry.room_ids().await.is_empty());
    }
}
