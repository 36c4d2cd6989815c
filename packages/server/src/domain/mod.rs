//! ドメイン層
//!
//! 値オブジェクト、エンティティ、ポリシー、およびインフラ層が実装する trait を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{Identity, Member, Room};
pub use error::{DomainError, RepositoryError};
pub use event::{PeerSummary, SignalEvent};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use policy::{DuplicateNamePolicy, RelayMode, SignalingConfig};
pub use repository::{JoinRecord, LeaveRecord, SignalingRepository};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DisplayName, OpaquePayload, RoomName, Timestamp,
};
