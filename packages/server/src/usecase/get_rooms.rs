//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::{Room, SignalingRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn SignalingRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn SignalingRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する全ルーム（ルーム名順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}
