//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectPeerUseCase, DisconnectPeerUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    JoinRoomUseCase, RelayDataUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectPeerUseCase（接続登録のユースケース）
    pub connect_peer_usecase: Arc<ConnectPeerUseCase>,
    /// JoinRoomUseCase（ルーム join のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RelayDataUseCase（data 中継のユースケース）
    pub relay_data_usecase: Arc<RelayDataUseCase>,
    /// DisconnectPeerUseCase（切断処理のユースケース）
    pub disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
