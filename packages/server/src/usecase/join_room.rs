//! UseCase: ルームへの join 処理
//!
//! 1. 入力検証（username / room）。失敗したら joiner にだけ `error` を返し、状態は変更しない
//! 2. 既に別のルームにいる場合は、先にそのルームから離脱する（`peer_left` を旧ルームへ）
//! 3. ルームのロックを取得し、Repository で join（ルーム作成、同名メンバーの追い出し、登録）
//! 4. 追い出したメンバーごとに `peer_left` を既存メンバーへ
//! 5. `ready` を joiner へ、`new_peer` を既存メンバーへ
//!
//! 3-5 はルームのロックを保持したまま実行されるため、各ピアが観測するイベントの順序は
//! 状態遷移の順序と一致します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, DuplicateNamePolicy, JoinRecord, MessagePusher, PeerSummary,
    RoomName, SignalEvent, SignalingRepository,
};

use super::{
    error::JoinError,
    membership::leave_current_room,
    room_lock::RoomLocks,
    validation::required,
};

/// join の入力（ワイヤから受け取ったままの値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinCommand {
    pub username: Option<String>,
    pub room: Option<String>,
}

/// ルーム join のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn SignalingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    room_locks: Arc<RoomLocks>,
    policy: DuplicateNamePolicy,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn SignalingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        room_locks: Arc<RoomLocks>,
        policy: DuplicateNamePolicy,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            room_locks,
            policy,
        }
    }

    /// join を実行
    ///
    /// 入力エラーの場合は joiner に `error` イベントを送ったうえで `Err` を返します。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        command: JoinCommand,
    ) -> Result<JoinRecord, JoinError> {
        let (display_name, room_name) = match validate(command) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!("Rejected join from '{}': {}", connection_id, e);
                self.reply_error(connection_id, &e).await;
                return Err(e);
            }
        };

        leave_current_room(
            self.repository.as_ref(),
            self.message_pusher.as_ref(),
            &self.room_locks,
            connection_id,
        )
        .await;

        let _guard = self.room_locks.lock(&room_name).await;
        let record = match self
            .repository
            .join_room(&room_name, connection_id.clone(), display_name, self.policy)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                let e = JoinError::from(e);
                tracing::warn!("Join of '{}' failed: {}", connection_id, e);
                self.reply_error(connection_id, &e).await;
                return Err(e);
            }
        };

        let existing_ids: Vec<ConnectionId> = record
            .existing_peers
            .iter()
            .map(|m| m.connection_id.clone())
            .collect();

        for stale in &record.evicted {
            tracing::info!(
                "'{}' ({}) superseded by '{}' in room '{}'",
                stale.display_name,
                stale.connection_id,
                connection_id,
                room_name
            );
            self.broadcast(existing_ids.clone(), &SignalEvent::peer_left(stale))
                .await;
        }

        let ready = SignalEvent::Ready {
            username: record.joined.display_name.clone(),
            peers: record.existing_peers.iter().map(PeerSummary::from).collect(),
        };
        if let Err(e) = self.message_pusher.push_to(connection_id, &ready).await {
            tracing::warn!("Failed to push ready to '{}': {}", connection_id, e);
        }

        let new_peer = SignalEvent::NewPeer {
            sid: connection_id.clone(),
            username: record.joined.display_name.clone(),
        };
        self.broadcast(existing_ids, &new_peer).await;

        tracing::info!(
            "'{}' ({}) joined room '{}' with {} existing peer(s)",
            record.joined.display_name,
            connection_id,
            room_name,
            record.existing_peers.len()
        );

        Ok(record)
    }

    async fn reply_error(&self, connection_id: &ConnectionId, error: &JoinError) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &SignalEvent::error(error.to_string()))
            .await
        {
            tracing::warn!("Failed to push error to '{}': {}", connection_id, e);
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &SignalEvent) {
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
        }
    }
}

fn validate(command: JoinCommand) -> Result<(DisplayName, RoomName), JoinError> {
    let mut missing = Vec::new();
    let username = required::<DisplayName>(command.username, "username", &mut missing);
    let room = required::<RoomName>(command.room, "room", &mut missing);

    match (username, room) {
        (Some(username), Some(room)) => Ok((username, room)),
        _ => Err(JoinError::MissingFields(missing)),
    }
}
