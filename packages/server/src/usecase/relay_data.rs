//! UseCase: data イベントの中継
//!
//! 中継方式は起動時の設定（`RelayMode`）で 1 つに決まります。
//!
//! - Targeted: `targetPeerId` で指定された 1 接続にだけ届ける。ターゲットがルームにいなければ何もしない
//! - Broadcast: ルームのロックを取得して取ったメンバーのスナップショットから、送信者以外の全員に届ける
//!
//! どちらの方式でもペイロードは加工せずにそのまま転送します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, MessagePushError, MessagePusher, OpaquePayload, RelayMode,
    RoomName, SignalEvent, SignalingRepository,
};

use super::{
    error::RelayError,
    room_lock::RoomLocks,
    validation::{required, required_payload},
};

/// data の入力（ワイヤから受け取ったままの値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayCommand {
    pub username: Option<String>,
    pub room: Option<String>,
    pub target_peer_id: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// data 中継のユースケース
pub struct RelayDataUseCase {
    repository: Arc<dyn SignalingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    room_locks: Arc<RoomLocks>,
    mode: RelayMode,
}

impl RelayDataUseCase {
    pub fn new(
        repository: Arc<dyn SignalingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        room_locks: Arc<RoomLocks>,
        mode: RelayMode,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            room_locks,
            mode,
        }
    }

    /// data を中継し、実際に送信した接続 ID を返す
    ///
    /// 入力エラーの場合は送信者に `error` イベントを送ったうえで `Err` を返します。
    pub async fn execute(
        &self,
        sender_id: &ConnectionId,
        command: RelayCommand,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let result = match self.mode {
            RelayMode::Targeted => self.relay_targeted(sender_id, command).await,
            RelayMode::Broadcast => self.relay_broadcast(sender_id, command).await,
        };

        if let Err(e) = &result {
            tracing::warn!("Rejected data from '{}': {}", sender_id, e);
            if let Err(push_err) = self
                .message_pusher
                .push_to(sender_id, &SignalEvent::error(e.to_string()))
                .await
            {
                tracing::warn!("Failed to push error to '{}': {}", sender_id, push_err);
            }
        }
        result
    }

    async fn relay_targeted(
        &self,
        sender_id: &ConnectionId,
        command: RelayCommand,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let mut missing = Vec::new();
        let username = required::<DisplayName>(command.username, "username", &mut missing);
        let room = required::<RoomName>(command.room, "room", &mut missing);
        let target = required::<ConnectionId>(command.target_peer_id, "targetPeerId", &mut missing);
        let data = required_payload(command.data, "data", &mut missing);
        let (Some(username), Some(room), Some(target), Some(data)) = (username, room, target, data)
        else {
            return Err(RelayError::TargetedMissingFields(missing));
        };

        let _guard = self.room_locks.lock(&room).await;
        let in_room = self
            .repository
            .members(&room)
            .await
            .iter()
            .any(|m| m.connection_id == target);
        if !in_room {
            tracing::debug!(
                "Target '{}' is not in room '{}', dropping data from '{}'",
                target,
                room,
                sender_id
            );
            return Ok(Vec::new());
        }

        let event = data_event(username, room, sender_id, data);
        match self.message_pusher.push_to(&target, &event).await {
            Ok(()) => {
                tracing::debug!("Relayed data from '{}' to '{}'", sender_id, target);
                Ok(vec![target])
            }
            Err(MessagePushError::ClientNotFound(_)) => {
                tracing::debug!("Target '{}' has no outbound buffer, dropping data", target);
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("Failed to relay data to '{}': {}", target, e);
                Ok(Vec::new())
            }
        }
    }

    async fn relay_broadcast(
        &self,
        sender_id: &ConnectionId,
        command: RelayCommand,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let mut missing = Vec::new();
        let username = required::<DisplayName>(command.username, "username", &mut missing);
        let room = required::<RoomName>(command.room, "room", &mut missing);
        let data = required_payload(command.data, "data", &mut missing);
        let (Some(username), Some(room), Some(data)) = (username, room, data) else {
            return Err(RelayError::BroadcastMissingFields(missing));
        };

        let _guard = self.room_locks.lock(&room).await;
        let audience: Vec<ConnectionId> = self
            .repository
            .members(&room)
            .await
            .into_iter()
            .map(|m| m.connection_id)
            .filter(|id| id != sender_id)
            .collect();

        let event = data_event(username, room, sender_id, data);
        if let Err(e) = self
            .message_pusher
            .broadcast(audience.clone(), &event)
            .await
        {
            tracing::warn!("Failed to broadcast data from '{}': {}", sender_id, e);
        }
        tracing::debug!(
            "Broadcasted data from '{}' to {} peer(s)",
            sender_id,
            audience.len()
        );
        Ok(audience)
    }
}

fn data_event(
    username: DisplayName,
    room: RoomName,
    sender_id: &ConnectionId,
    data: OpaquePayload,
) -> SignalEvent {
    SignalEvent::Data {
        username,
        room,
        sender_id: sender_id.clone(),
        data,
    }
}
