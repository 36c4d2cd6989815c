//! UseCase: 接続登録処理
//!
//! トランスポート層で新しい接続が確立されたとき、名前もルームも持たない接続として
//! Registry に登録し、送信バッファを MessagePusher に登録します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, SignalingRepository};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct ConnectPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SignalingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectPeerUseCase {
    /// 新しい ConnectPeerUseCase を作成
    pub fn new(
        repository: Arc<dyn SignalingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功
    /// * `Err(ConnectError)` - 同じ接続 ID が既に登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        if self.repository.is_registered(&connection_id).await {
            return Err(ConnectError::DuplicateConnectionId(
                connection_id.into_string(),
            ));
        }

        self.repository.register(connection_id.clone()).await;
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        Ok(())
    }
}
