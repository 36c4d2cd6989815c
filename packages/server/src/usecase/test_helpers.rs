//! UseCase のテスト用ヘルパー
//!
//! 実際の InMemory Repository と WebSocketMessagePusher を組み合わせ、各接続の送信バッファに
//! 積まれたフレームを `OutboundMessage` として取り出せるようにします。

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DuplicateNamePolicy, RelayMode},
    infrastructure::{
        dto::websocket::{
            ErrorPayload, OutboundMessage, PeerPayload, ReadyPayload, RelayedDataPayload,
        },
        message_pusher::WebSocketMessagePusher,
        repository::InMemorySignalingRepository,
    },
};

use super::{
    ConnectPeerUseCase, DisconnectPeerUseCase, JoinRoomUseCase, RelayDataUseCase, RoomLocks,
};

pub(crate) struct Harness {
    pub repository: Arc<InMemorySignalingRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub room_locks: Arc<RoomLocks>,
    pub connect_peer: ConnectPeerUseCase,
    pub join_room: JoinRoomUseCase,
    pub disconnect_peer: DisconnectPeerUseCase,
}

impl Harness {
    pub fn new(policy: DuplicateNamePolicy) -> Self {
        let repository = Arc::new(InMemorySignalingRepository::default());
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let room_locks = Arc::new(RoomLocks::default());
        Self {
            connect_peer: ConnectPeerUseCase::new(repository.clone(), message_pusher.clone()),
            join_room: JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                room_locks.clone(),
                policy,
            ),
            disconnect_peer: DisconnectPeerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                room_locks.clone(),
            ),
            repository,
            message_pusher,
            room_locks,
        }
    }

    pub fn relay_data(&self, mode: RelayMode) -> RelayDataUseCase {
        RelayDataUseCase::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            self.room_locks.clone(),
            mode,
        )
    }

    /// 接続を登録し、その送信バッファの受信側を返す
    pub async fn connect(&self, id: &str) -> Inbox {
        let id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connect_peer.execute(id.clone(), tx).await.unwrap();
        Inbox { id, rx }
    }
}

/// 1 接続分の送信バッファ
pub(crate) struct Inbox {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl Inbox {
    /// 積まれているフレームをすべて取り出す
    pub fn drain(&mut self) -> Vec<OutboundMessage> {
        let mut messages = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            messages.push(serde_json::from_str(&frame).unwrap());
        }
        messages
    }
}

pub(crate) fn peer(sid: &str, username: &str) -> PeerPayload {
    PeerPayload {
        sid: sid.to_string(),
        username: username.to_string(),
    }
}

pub(crate) fn error_msg(message: &str) -> OutboundMessage {
    OutboundMessage::Error(ErrorPayload {
        message: message.to_string(),
    })
}

pub(crate) fn ready_msg(username: &str, peers: Vec<PeerPayload>) -> OutboundMessage {
    OutboundMessage::Ready(ReadyPayload {
        username: username.to_string(),
        peers,
    })
}

pub(crate) fn new_peer_msg(sid: &str, username: &str) -> OutboundMessage {
    OutboundMessage::NewPeer(peer(sid, username))
}

pub(crate) fn peer_left_msg(sid: &str, username: &str) -> OutboundMessage {
    OutboundMessage::PeerLeft(peer(sid, username))
}

pub(crate) fn data_msg(
    username: &str,
    room: &str,
    sender_id: &str,
    data: serde_json::Value,
) -> OutboundMessage {
    OutboundMessage::Data(RelayedDataPayload {
        username: username.to_string(),
        room: room.to_string(),
        sender_id: sender_id.to_string(),
        data,
    })
}
