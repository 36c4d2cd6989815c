//! ルーム単位の排他制御
//!
//! 同じルームに対する join / data 中継の送信先計算 / 切断は直列化する必要があります。
//! ルーム名をハッシュして固定数のシャードに割り当て、シャードごとの Mutex で排他します。
//! 別のルームが同じシャードに入ることはありますが、その場合も直列化されるだけで正しさは保たれます。
//!
//! ロック順序: ルームのシャード -> Repository の内部ロック -> MessagePusher の内部ロック。
//! 2 つのシャードを同時に保持してはいけません。

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::RoomName;

/// デフォルトのシャード数
pub const DEFAULT_ROOM_LOCK_SHARDS: usize = 64;

/// ルーム単位のロック（シャード化）
pub struct RoomLocks {
    shards: Vec<Mutex<()>>,
}

impl RoomLocks {
    /// `shard_count` 個のシャードを持つ RoomLocks を作成（0 の場合は 1）
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        Self {
            shards: (0..shard_count).map(|_| Mutex::new(())).collect(),
        }
    }

    /// ルームのロックを取得
    pub async fn lock(&self, room_name: &RoomName) -> MutexGuard<'_, ()> {
        self.shards[self.shard_index(room_name)].lock().await
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, room_name: &RoomName) -> usize {
        let mut hasher = DefaultHasher::new();
        room_name.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }
}

impl Default for RoomLocks {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_LOCK_SHARDS)
    }
}
