//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：残りのメンバーに退出通知、退出者に room_left
//! - エッジケース：最後のメンバーが退出すると削除される（予約ルームは残る）
//! - 異常系：存在しないルーム、参加していないルーム

use std::sync::Arc;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, DepartureReason, MessagePusher, RoomName,
};

use super::presence::PresenceDispatcher;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
        }
    }

    pub async fn execute(
        &self,
        connection: &ConnectionId,
        name: RoomName,
    ) -> Result<(), ChatError> {
        let departure = self.repository.leave_room(connection, &name).await?;
        tracing::info!("User '{}' left room '{}'", departure.user, departure.room);

        self.presence
            .announce_departure(&departure, DepartureReason::Left)
            .await;
        self.presence
            .send_to(connection, &ChatEvent::RoomLeft { room: name })
            .await;
        self.presence.broadcast_rooms_list().await;
        Ok(())
    }
}
