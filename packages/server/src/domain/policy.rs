//! シグナリングの動作ポリシー
//!
//! 過去のサーバー実装の間で挙動が分かれていた 2 点を設定として明示します。
//! - データ中継のセマンティクス（`RelayMode`）
//! - 同名ユーザーの join 時の扱い（`DuplicateNamePolicy`）

use std::{fmt, str::FromStr};

use super::error::DomainError;

/// データ中継のセマンティクス（プロセス起動中は 1 つに固定）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayMode {
    /// `targetPeerId` で指定された 1 接続にのみ転送する
    #[default]
    Targeted,
    /// 送信者以外のルーム全員に転送する
    Broadcast,
}

impl FromStr for RelayMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "targeted" => Ok(Self::Targeted),
            "broadcast" => Ok(Self::Broadcast),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Targeted => f.write_str("targeted"),
            Self::Broadcast => f.write_str("broadcast"),
        }
    }
}

/// 同じルームに同じ表示名で join された場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateNamePolicy {
    /// 古い接続を追い出して新しい接続に置き換える（ブラウザのリロードを想定）
    #[default]
    EvictOld,
    /// 同名の接続の共存を許可する
    AllowDuplicate,
}

impl FromStr for DuplicateNamePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "evict-old" | "evict_old" => Ok(Self::EvictOld),
            "allow-duplicate" | "allow_duplicate" => Ok(Self::AllowDuplicate),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for DuplicateNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EvictOld => f.write_str("evict-old"),
            Self::AllowDuplicate => f.write_str("allow-duplicate"),
        }
    }
}

/// シグナリング全体の設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalingConfig {
    pub relay_mode: RelayMode,
    pub duplicate_name_policy: DuplicateNamePolicy,
}
