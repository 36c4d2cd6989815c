//! MessagePusher trait 定義
//!
//! トランスポート層の `send(connectionID, event)` プリミティブを抽象化します。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{event::SignalEvent, value_object::ConnectionId};

/// 接続ごとの送信バッファ（シリアライズ済みのフレーム）
///
/// 無制限チャンネルなので、遅いピアがルームの状態更新を止めることはありません。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// メッセージ送信の抽象化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信バッファを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信バッファを登録解除（存在しなくてもエラーにしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &SignalEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &SignalEvent,
    ) -> Result<(), MessagePushError>;
}
