//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成やポリシーの解析で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("payload must not be empty")]
    EmptyPayload,

    #[error("unknown policy value '{0}'")]
    UnknownPolicy(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// 1 接続が同時に所属できるルームは 1 つだけ
    #[error("connection '{connection_id}' is already a member of room '{room}'")]
    AlreadyInRoom { connection_id: String, room: String },
}
