//! Repository trait 定義
//!
//! Connection Registry（接続 ID -> 表示名・ルーム）と Room Directory（ルーム名 -> メンバー集合）を
//! 1 つの trait で表現します。両者を更新する操作は必ずペアでアトミックに行われます。
//!
//! ルーム単位の排他（`usecase::RoomLocks`）は呼び出し側の責務です。

use async_trait::async_trait;

use super::{
    DuplicateNamePolicy, RepositoryError,
    entity::{Identity, Member, Room},
    value_object::{ConnectionId, DisplayName, RoomName},
};

/// join の結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRecord {
    /// 追加されたメンバー（joiner）
    pub joined: Member,
    /// 同名のため追い出された古いメンバー（Registry からも削除済み）
    pub evicted: Vec<Member>,
    /// 追い出し後、joiner 以外の既存メンバー（参加順）
    pub existing_peers: Vec<Member>,
}

/// ルームからの離脱結果
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRecord {
    pub room_name: RoomName,
    /// 削除されたメンバー
    pub member: Member,
    /// 残ったメンバーの接続 ID
    pub remaining: Vec<ConnectionId>,
    /// メンバーが空になりルームが削除されたか
    pub room_deleted: bool,
}

/// Signaling Repository trait
#[async_trait]
pub trait SignalingRepository: Send + Sync {
    /// 名前もルームも持たない接続を登録
    async fn register(&self, connection_id: ConnectionId);

    /// 接続が登録済みか
    async fn is_registered(&self, connection_id: &ConnectionId) -> bool;

    /// 接続の（表示名, ルーム名）を取得。未登録または未 join なら None
    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Identity>;

    /// 接続を Registry から削除（冪等）
    async fn remove(&self, connection_id: &ConnectionId);

    /// ルームに join する
    ///
    /// ルームの遅延作成、同名メンバーの追い出し（ポリシー次第）、メンバー集合と Registry への
    /// 追加を 1 回のロックで行います。接続が既に別のルームにいる場合は `AlreadyInRoom`。
    async fn join_room(
        &self,
        room_name: &RoomName,
        connection_id: ConnectionId,
        display_name: DisplayName,
        policy: DuplicateNamePolicy,
    ) -> Result<JoinRecord, RepositoryError>;

    /// ルームから離脱する
    ///
    /// メンバー集合と Registry の所属情報をペアで削除し、空になったルームは削除します。
    /// 接続がそのルームのメンバーでなければ None（冪等）。
    async fn leave_room(
        &self,
        room_name: &RoomName,
        connection_id: &ConnectionId,
    ) -> Option<LeaveRecord>;

    /// ルームのメンバーのスナップショット（ルームがなければ空）
    async fn members(&self, room_name: &RoomName) -> Vec<Member>;

    /// ルームを取得
    async fn get_room(&self, room_name: &RoomName) -> Result<Room, RepositoryError>;

    /// 全ルームを取得（ルーム名順）
    async fn get_rooms(&self) -> Vec<Room>;

    /// 登録中の接続数
    async fn count_connections(&self) -> usize;
}
