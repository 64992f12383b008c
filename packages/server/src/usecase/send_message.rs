//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase の group / private / room 送信
//! - 履歴への追加と配信先の選定
//!
//! ### なぜこのテストが必要か
//! - 個人メッセージは送信者にもエコーされる（配信確認のため）
//! - ルーム送信はメンバーでなくても可能で、配信先はルームのメンバーのみ
//!
//! ### どのような状況を想定しているか
//! - 正常系：各種メッセージの配信
//! - 異常系：未登録ユーザー、存在しない宛先、オフラインの宛先、存在しないルーム

use std::sync::Arc;

use kaiwa_shared::time::Clock;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, MessageContent, MessagePusher, RoomName,
    Timestamp, UserName,
};

use super::presence::PresenceDispatcher;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// グループメッセージを全アクティブユーザーに配信
    pub async fn send_group(
        &self,
        connection: &ConnectionId,
        content: MessageContent,
    ) -> Result<(), ChatError> {
        let delivery = self
            .repository
            .post_group_message(connection, content, self.now())
            .await?;
        tracing::debug!(
            "Group message from '{}' to {} connection(s)",
            delivery.message.sender,
            delivery.recipients.len()
        );
        self.presence
            .send_to_many(delivery.recipients, &ChatEvent::GroupMessage(delivery.message))
            .await;
        Ok(())
    }

    /// 個人メッセージを送信者と受信者に配信
    pub async fn send_private(
        &self,
        connection: &ConnectionId,
        receiver: UserName,
        content: MessageContent,
    ) -> Result<(), ChatError> {
        let delivery = self
            .repository
            .post_private_message(connection, receiver, content, self.now())
            .await?;
        self.presence
            .send_to_many(
                delivery.recipients,
                &ChatEvent::PrivateMessage(delivery.message),
            )
            .await;
        Ok(())
    }

    /// ルームメッセージをルームのメンバーに配信
    pub async fn send_room(
        &self,
        connection: &ConnectionId,
        room: RoomName,
        content: MessageContent,
    ) -> Result<(), ChatError> {
        let delivery = self
            .repository
            .post_room_message(connection, room, content, self.now())
            .await?;
        self.presence
            .send_to_many(delivery.recipients, &ChatEvent::RoomMessage(delivery.message))
            .await;
        Ok(())
    }
}
