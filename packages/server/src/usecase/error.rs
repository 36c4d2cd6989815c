//! UseCase 層のエラー定義
//!
//! `Display` の文言は、そのまま `error` イベントの `message` としてクライアントに返されます。

use thiserror::Error;

use crate::domain::RepositoryError;

/// 接続登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnectionId(String),
}

/// join のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("Username and room are required! Missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Failed to join room: {0}")]
    Repository(#[from] RepositoryError),
}

/// data 中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(
        "Invalid data format! username, room, targetPeerId, and data are required. Missing: {}",
        .0.join(", ")
    )]
    TargetedMissingFields(Vec<&'static str>),

    #[error(
        "Invalid data format! username, room, and data are required. Missing: {}",
        .0.join(", ")
    )]
    BroadcastMissingFields(Vec<&'static str>),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
