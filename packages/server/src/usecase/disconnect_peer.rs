//! UseCase: 切断処理
//!
//! トランスポート層で接続が閉じたときに呼ばれます（正常なクローズ、エラー、タイムアウトを問わず）。
//!
//! 1. 所属ルームがあれば離脱させ、残りのメンバーに `peer_left` を送信（空のルームは削除）
//! 2. Registry から接続を削除
//! 3. 送信バッファを MessagePusher から登録解除
//!
//! 何度呼ばれても後始末は 1 回だけ行われます。

use std::sync::Arc;

use crate::domain::{ConnectionId, LeaveRecord, MessagePusher, SignalingRepository};

use super::{membership::leave_current_room, room_lock::RoomLocks};

/// 切断処理のユースケース
pub struct DisconnectPeerUseCase {
    repository: Arc<dyn SignalingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    room_locks: Arc<RoomLocks>,
}

impl DisconnectPeerUseCase {
    pub fn new(
        repository: Arc<dyn SignalingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        room_locks: Arc<RoomLocks>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            room_locks,
        }
    }

    /// 切断処理を実行
    ///
    /// # Returns
    ///
    /// ルームから離脱した場合はその結果。未 join、追い出し済み、二重の切断通知の場合は None
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<LeaveRecord> {
        let record = leave_current_room(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            &self.room_locks,
            connection_id,
        )
        .await;

        self.repository.remove(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        tracing::debug!("Connection '{}' cleaned up", connection_id);

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DuplicateNamePolicy, RoomName},
        infrastructure::dto::websocket::OutboundMessage,
        usecase::{
            JoinCommand,
            test_helpers::{Harness, peer_left_msg},
        },
    };

    fn join(username: &str) -> JoinCommand {
        JoinCommand {
            username: Some(username.to_string()),
            room: Some("r1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // テスト項目: 切断すると残りのメンバーに peer_left が届き、接続は Registry から消える
        // given (前提条件):
        let harness = Harness::new(DuplicateNamePolicy::EvictOld);
        let mut a = harness.connect("a").await;
        let mut b = harness.connect("b").await;
        harness.join_room.execute(&a.id, join("Alice")).await.unwrap();
        harness.join_room.execute(&b.id, join("Bob")).await.unwrap();
        a.drain();
        b.drain();

        // when (操作):
        let record = harness.disconnect_peer.execute(&a.id).await.unwrap();

        // then (期待する結果):
        assert!(!record.room_deleted);
        assert_eq!(b.drain(), vec![peer_left_msg("a", "Alice")]);
        assert!(!harness.repository.is_registered(&a.id).await);
    }

    #[tokio::test]
    async fn test_disconnect_last_member_deletes_room() {
        // テスト項目: 最後のメンバーが切断するとルームが削除される
        // given (前提条件):
        let harness = Harness::new(DuplicateNamePolicy::EvictOld);
        let a = harness.connect("a").await;
        harness.join_room.execute(&a.id, join("Alice")).await.unwrap();

        // when (操作):
        let record = harness.disconnect_peer.execute(&a.id).await.unwrap();

        // then (期待する結果):
        assert!(record.room_deleted);
        assert!(
            harness
                .repository
                .get_room(&RoomName::new("r1".to_string()).unwrap())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_duplicate_disconnect_is_noop() {
        // テスト項目: 二重の切断通知では peer_left は 1 回しか送られない
        // given (前提条件):
        let harness = Harness::new(DuplicateNamePolicy::EvictOld);
        let a = harness.connect("a").await;
        let mut b = harness.connect("b").await;
        harness.join_room.execute(&a.id, join("Alice")).await.unwrap();
        harness.join_room.execute(&b.id, join("Bob")).await.unwrap();
        b.drain();

        // when (操作):
        let first = harness.disconnect_peer.execute(&a.id).await;
        let second = harness.disconnect_peer.execute(&a.id).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(b.drain(), vec![peer_left_msg("a", "Alice")]);
    }

    #[tokio::test]
    async fn test_disconnect_of_superseded_session_is_noop() {
        // テスト項目: 追い出された古いセッションの切断では peer_left が重ねて送られない
        // given (前提条件):
        let harness = Harness::new(DuplicateNamePolicy::EvictOld);
        let old = harness.connect("old").await;
        let mut b = harness.connect("b").await;
        let new = harness.connect("new").await;
        harness.join_room.execute(&old.id, join("Alice")).await.unwrap();
        harness.join_room.execute(&b.id, join("Bob")).await.unwrap();
        harness.join_room.execute(&new.id, join("Alice")).await.unwrap();
        b.drain();

        // when (操作):
        let record = harness.disconnect_peer.execute(&old.id).await;

        // then (期待する結果):
        assert!(record.is_none());
        assert!(b.drain().is_empty());
        let identity = harness.repository.lookup(&new.id).await.unwrap();
        assert_eq!(identity.display_name.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_disconnect_unjoined_connection() {
        // テスト項目: join していない接続の切断は Registry から削除するだけ
        // given (前提条件):
        let harness = Harness::new(DuplicateNamePolicy::EvictOld);
        let a = harness.connect("a").await;

        // when (操作):
        let record = harness.disconnect_peer.execute(&a.id).await;

        // then (期待する結果):
        assert!(record.is_none());
        assert_eq!(harness.repository.count_connections().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_supersede_and_disconnect_notify_once() {
        // テスト項目: 同名の再接続による join と古いセッションの切断が同時に起きても、
        //             残りのメンバーへの peer_left は 1 回だけで、メンバー集合と Registry は一致する
        for _ in 0..100 {
            // given (前提条件):
            let harness = Arc::new(Harness::new(DuplicateNamePolicy::EvictOld));
            let old = harness.connect("old").await;
            let mut bob = harness.connect("bob").await;
            let new = harness.connect("new").await;
            harness.join_room.execute(&old.id, join("Alice")).await.unwrap();
            harness.join_room.execute(&bob.id, join("Bob")).await.unwrap();
            bob.drain();

            // when (操作):
            let joining = {
                let harness = harness.clone();
                let id = new.id.clone();
                tokio::spawn(async move { harness.join_room.execute(&id, join("Alice")).await })
            };
            let leaving = {
                let harness = harness.clone();
                let id = old.id.clone();
                tokio::spawn(async move { harness.disconnect_peer.execute(&id).await })
            };
            joining.await.unwrap().unwrap();
            leaving.await.unwrap();

            // then (期待する結果):
            let peer_left_count = bob
                .drain()
                .into_iter()
                .filter(|m| matches!(m, OutboundMessage::PeerLeft(p) if p.sid == "old"))
                .count();
            assert_eq!(peer_left_count, 1);

            let room = harness
                .repository
                .get_room(&RoomName::new("r1".to_string()).unwrap())
                .await
                .unwrap();
            let mut ids: Vec<&str> = room.members.iter().map(|m| m.connection_id.as_str()).collect();
            ids.sort();
            assert_eq!(ids, vec!["bob", "new"]);
            for member in &room.members {
                let identity = harness.repository.lookup(&member.connection_id).await.unwrap();
                assert_eq!(identity.room_name, room.name);
                assert_eq!(identity.display_name, member.display_name);
            }
            assert!(!harness.repository.is_registered(&old.id).await);
        }
    }
}
