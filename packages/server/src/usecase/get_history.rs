//! UseCase: 履歴取得処理
//!
//! 履歴は要求した接続にだけ返す。グループとルームの履歴は未登録でも取得でき、
//! 個人チャットの履歴は登録が必要。

use std::sync::Arc;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, MessagePusher, RoomName, UserName,
};

use super::presence::PresenceDispatcher;

/// 履歴取得のユースケース
pub struct GetHistoryUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
}

impl GetHistoryUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
        }
    }

    pub async fn group(&self, connection: &ConnectionId) {
        let messages = self.repository.group_history().await;
        self.presence
            .send_to(connection, &ChatEvent::GroupHistory(messages))
            .await;
    }

    pub async fn private(
        &self,
        connection: &ConnectionId,
        other: UserName,
    ) -> Result<(), ChatError> {
        let messages = self
            .repository
            .private_history(connection, other.clone())
            .await?;
        self.presence
            .send_to(
                connection,
                &ChatEvent::PrivateHistory {
                    with: other,
                    messages,
                },
            )
            .await;
        Ok(())
    }

    pub async fn room(&self, connection: &ConnectionId, room: RoomName) -> Result<(), ChatError> {
        let messages = self.repository.room_history(&room).await?;
        self.presence
            .send_to(connection, &ChatEvent::RoomHistory { room, messages })
            .await;
        Ok(())
    }
}
