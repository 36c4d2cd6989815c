//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomName, SignalingRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn SignalingRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn SignalingRepository>) -> Self {
        Self { repository }
    }

    /// ルーム名からルームを取得
    ///
    /// 空のルーム名は存在しないルームとして扱います。
    pub async fn execute(&self, room_name: String) -> Result<Room, GetRoomDetailError> {
        let room_name = RoomName::new(room_name).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_name)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, DisplayName, DuplicateNamePolicy},
        infrastructure::repository::InMemorySignalingRepository,
        usecase::GetRoomsUseCase,
    };

    #[tokio::test]
    async fn test_get_room_detail_and_list() {
        // テスト項目: 存在するルームは取得でき、存在しないルームは RoomNotFound
        // given (前提条件):
        let repository = Arc::new(InMemorySignalingRepository::default());
        repository
            .join_room(
                &RoomName::new("r1".to_string()).unwrap(),
                ConnectionId::new("a".to_string()).unwrap(),
                DisplayName::new("Alice".to_string()).unwrap(),
                DuplicateNamePolicy::EvictOld,
            )
            .await
            .unwrap();
        let detail = GetRoomDetailUseCase::new(repository.clone());
        let list = GetRoomsUseCase::new(repository);

        // when (操作):
        let found = detail.execute("r1".to_string()).await;
        let missing = detail.execute("r2".to_string()).await;
        let empty = detail.execute(String::new()).await;
        let rooms = list.execute().await;

        // then (期待する結果):
        assert_eq!(found.unwrap().members[0].display_name.as_str(), "Alice");
        assert_eq!(missing, Err(GetRoomDetailError::RoomNotFound));
        assert_eq!(empty, Err(GetRoomDetailError::RoomNotFound));
        assert_eq!(rooms.len(), 1);
    }
}
