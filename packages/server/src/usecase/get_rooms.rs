//! UseCase: ルーム一覧・詳細の取得

use std::sync::Arc;

use crate::domain::{ChatRepository, Room, RoomName, RoomSummary};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 名前順のルーム一覧
    pub async fn execute(&self) -> Vec<RoomSummary> {
        self.repository.rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 名前として不正な値も `RoomNotFound` として扱う
    pub async fn execute(&self, name: String) -> Result<Room, GetRoomDetailError> {
        let room_name =
            RoomName::new(name.clone()).map_err(|_| GetRoomDetailError::RoomNotFound(name.clone()))?;
        self.repository
            .room(&room_name)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound(name))
    }
}
