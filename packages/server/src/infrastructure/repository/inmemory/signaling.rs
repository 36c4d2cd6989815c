//! InMemory Signaling Repository 実装
//!
//! ドメイン層が定義する SignalingRepository trait の具体的な実装。
//! Registry と Directory を 1 つの Mutex で保護し、両者の更新を常にペアで行います。
//!
//! ロックは Repository メソッド 1 回の間だけ保持されます。ルーム単位で複数の操作を
//! 直列化したい場合は、呼び出し側が `RoomLocks` を取得してから呼び出します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use sigrelay_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, DuplicateNamePolicy, Identity, JoinRecord, LeaveRecord, Member,
    RepositoryError, Room, RoomName, SignalingRepository, Timestamp,
};

/// Registry と Directory
#[derive(Default)]
struct Tables {
    /// 接続 ID -> 所属情報（未 join なら None）
    registry: HashMap<ConnectionId, Option<Identity>>,
    /// ルーム名 -> ルーム（メンバーが空のルームは存在しない）
    rooms: HashMap<RoomName, Room>,
}

/// インメモリ Signaling Repository 実装
pub struct InMemorySignalingRepository {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemorySignalingRepository {
    /// 新しい InMemorySignalingRepository を作成
    ///
    /// `clock` はルーム作成時刻とメンバーの参加時刻に使われます。
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    /// Registry のスナップショット（接続 ID 順）
    pub async fn registry_snapshot(&self) -> Vec<(ConnectionId, Option<Identity>)> {
        let tables = self.tables.lock().await;
        let mut entries: Vec<(ConnectionId, Option<Identity>)> = tables
            .registry
            .iter()
            .map(|(id, identity)| (id.clone(), identity.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

impl Default for InMemorySignalingRepository {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl SignalingRepository for InMemorySignalingRepository {
    async fn register(&self, connection_id: ConnectionId) {
        let mut tables = self.tables.lock().await;
        tables.registry.entry(connection_id).or_insert(None);
    }

    async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        let tables = self.tables.lock().await;
        tables.registry.contains_key(connection_id)
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Identity> {
        let tables = self.tables.lock().await;
        tables.registry.get(connection_id).cloned().flatten()
    }

    async fn remove(&self, connection_id: &ConnectionId) {
        let mut tables = self.tables.lock().await;
        tables.registry.remove(connection_id);
    }

    async fn join_room(
        &self,
        room_name: &RoomName,
        connection_id: ConnectionId,
        display_name: DisplayName,
        policy: DuplicateNamePolicy,
    ) -> Result<JoinRecord, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables.lock().await;
        let Tables { registry, rooms } = &mut *tables;

        if let Some(Some(identity)) = registry.get(&connection_id) {
            return Err(RepositoryError::AlreadyInRoom {
                connection_id: connection_id.into_string(),
                room: identity.room_name.as_str().to_string(),
            });
        }

        let room = rooms
            .entry(room_name.clone())
            .or_insert_with(|| Room::new(room_name.clone(), now));

        let mut evicted = Vec::new();
        if policy == DuplicateNamePolicy::EvictOld {
            for stale_id in room.stale_members_named(&display_name, &connection_id) {
                if let Some(stale) = room.remove_member(&stale_id) {
                    registry.remove(&stale_id);
                    evicted.push(stale);
                }
            }
        }

        let existing_peers = room.members_except(&connection_id);
        let joined = Member::new(connection_id.clone(), display_name.clone(), now);
        room.add_member(joined.clone());
        registry.insert(
            connection_id,
            Some(Identity {
                display_name,
                room_name: room_name.clone(),
            }),
        );

        Ok(JoinRecord {
            joined,
            evicted,
            existing_peers,
        })
    }

    async fn leave_room(
        &self,
        room_name: &RoomName,
        connection_id: &ConnectionId,
    ) -> Option<LeaveRecord> {
        let mut tables = self.tables.lock().await;
        let Tables { registry, rooms } = &mut *tables;

        let room = rooms.get_mut(room_name)?;
        let member = room.remove_member(connection_id)?;

        if let Some(entry) = registry.get_mut(connection_id)
            && matches!(entry, Some(identity) if &identity.room_name == room_name)
        {
            *entry = None;
        }

        let remaining = room.connection_ids();
        let room_deleted = room.is_empty();
        if room_deleted {
            rooms.remove(room_name);
        }

        Some(LeaveRecord {
            room_name: room_name.clone(),
            member,
            remaining,
            room_deleted,
        })
    }

    async fn members(&self, room_name: &RoomName) -> Vec<Member> {
        let tables = self.tables.lock().await;
        tables
            .rooms
            .get(room_name)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    async fn get_room(&self, room_name: &RoomName) -> Result<Room, RepositoryError> {
        let tables = self.tables.lock().await;
        tables
            .rooms
            .get(room_name)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_name.as_str().to_string()))
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let tables = self.tables.lock().await;
        let mut rooms: Vec<Room> = tables.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }

    async fn count_connections(&self) -> usize {
        let tables = self.tables.lock().await;
        tables.registry.len()
    }
}
