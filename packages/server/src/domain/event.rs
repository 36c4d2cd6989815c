//! サーバーからクライアントへ送るシグナリングイベント（ドメインモデル）
//!
//! ワイヤ形式への変換は Infrastructure 層（`infrastructure::dto`）が担当します。

use super::{
    entity::Member,
    value_object::{ConnectionId, DisplayName, OpaquePayload, RoomName},
};

/// `ready` イベントで joiner に渡す既存ピアの情報
#[derive(Debug, Clone, PartialEq)]
pub struct PeerSummary {
    pub sid: ConnectionId,
    pub username: DisplayName,
}

impl From<&Member> for PeerSummary {
    fn from(member: &Member) -> Self {
        Self {
            sid: member.connection_id.clone(),
            username: member.display_name.clone(),
        }
    }
}

/// 送信イベント
#[derive(Debug, Clone, PartialEq)]
pub enum SignalEvent {
    /// 送信者のみに返す入力エラー
    Error { message: String },
    /// joiner のみ: 自分の表示名と既存ピア一覧
    Ready {
        username: DisplayName,
        peers: Vec<PeerSummary>,
    },
    /// joiner 以外のメンバー: 新しいピアの参加
    NewPeer {
        sid: ConnectionId,
        username: DisplayName,
    },
    /// 中継データ（ターゲット 1 人、または送信者以外のルーム全員）
    Data {
        username: DisplayName,
        room: RoomName,
        sender_id: ConnectionId,
        data: OpaquePayload,
    },
    /// 残りのメンバー: ピアの離脱（切断または再接続による置き換え）
    PeerLeft {
        sid: ConnectionId,
        username: DisplayName,
    },
}

impl SignalEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn peer_left(member: &Member) -> Self {
        Self::PeerLeft {
            sid: member.connection_id.clone(),
            username: member.display_name.clone(),
        }
    }

    /// ワイヤ上のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Ready { .. } => "ready",
            Self::NewPeer { .. } => "new_peer",
            Self::Data { .. } => "data",
            Self::PeerLeft { .. } => "peer_left",
        }
    }
}
