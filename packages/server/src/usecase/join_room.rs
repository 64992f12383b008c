//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者に room_joined、メンバーに参加通知、全員にルーム一覧
//! - 正常系：別ルームからの移動（旧ルームが空なら削除）
//! - エッジケース：参加済みのルームへの再参加は何も変えない
//! - 異常系：存在しないルーム

use std::sync::Arc;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, DepartureReason, MessagePusher, RoomName,
};

use super::presence::PresenceDispatcher;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
        }
    }

    pub async fn execute(&self, connection: &ConnectionId, name: RoomName) -> Result<(), ChatError> {
        let join = self.repository.join_room(connection, name).await?;

        if let Some(departure) = &join.departure {
            self.presence
                .announce_departure(departure, DepartureReason::Left)
                .await;
        }
        self.presence
            .send_to(
                connection,
                &ChatEvent::RoomJoined {
                    room: join.room.name.clone(),
                    description: join.room.description.clone(),
                    members: join.room.members.iter().cloned().collect(),
                },
            )
            .await;
        if join.already_member {
            return Ok(());
        }

        tracing::info!("User '{}' joined room '{}'", join.user, join.room.name);
        self.presence
            .send_to_many(
                join.audience,
                &ChatEvent::member_joined(&join.room.name, &join.user),
            )
            .await;
        self.presence.broadcast_rooms_list().await;
        Ok(())
    }
}
