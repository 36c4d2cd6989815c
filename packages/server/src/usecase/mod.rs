//! UseCase 層
//!
//! 受信イベント（接続・join・data・切断）ごとに、Repository と MessagePusher を使って
//! 状態遷移と送信先（1 接続 / ルーム全体 / 送信者以外のルーム全体）を決定します。

mod connect_peer;
mod disconnect_peer;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod membership;
mod relay_data;
mod room_lock;
mod validation;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use connect_peer::ConnectPeerUseCase;
pub use disconnect_peer::DisconnectPeerUseCase;
pub use error::{ConnectError, GetRoomDetailError, JoinError, RelayError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinCommand, JoinRoomUseCase};
pub use relay_data::{RelayCommand, RelayDataUseCase};
pub use room_lock::{DEFAULT_ROOM_LOCK_SHARDS, RoomLocks};
