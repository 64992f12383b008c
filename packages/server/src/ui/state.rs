//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    CoordinatorHandle, GetActiveUsersUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
};

/// Shared application state
pub struct AppState {
    /// 状態を変更するコマンドの投入口（WebSocket 用）
    pub coordinator: CoordinatorHandle,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetActiveUsersUseCase（アクティブユーザー一覧取得のユースケース）
    pub get_active_users_usecase: Arc<GetActiveUsersUseCase>,
}
