//! UseCase 層のエラー定義

use thiserror::Error;

/// コーディネーターへのコマンド投入エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("Coordinator is no longer running")]
    Closed,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}
