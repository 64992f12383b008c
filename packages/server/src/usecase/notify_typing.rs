//! UseCase: 入力中シグナルの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NotifyTypingUseCase::execute() メソッド
//! - スコープごとの通知先と再送抑止（2 秒）
//!
//! ### どのような状況を想定しているか
//! - 正常系：group / private / room の各スコープ
//! - エッジケース：再送抑止期間内の連続シグナル、オフラインの宛先、未登録の接続

use std::{sync::Arc, time::Instant};

use crate::domain::{
    ChatEvent, ChatRepository, ChatType, ConnectionId, MessagePusher, TYPING_DISPLAY_TIMEOUT,
    TypingScope,
};

use super::presence::PresenceDispatcher;

/// 入力中シグナル中継のユースケース
pub struct NotifyTypingUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
}

impl NotifyTypingUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
        }
    }

    pub async fn execute(&self, connection: &ConnectionId, scope: TypingScope) {
        self.execute_at(connection, scope, Instant::now()).await;
    }

    /// 中継しなかったシグナルはエラーにせず黙って捨てる
    pub async fn execute_at(&self, connection: &ConnectionId, scope: TypingScope, now: Instant) {
        let Some(signal) = self.repository.record_typing(connection, scope, now).await else {
            return;
        };
        let (chat_type, room) = match signal.scope {
            TypingScope::Group => (ChatType::Group, None),
            TypingScope::Private(_) => (ChatType::Private, None),
            TypingScope::Room(room) => (ChatType::Room, Some(room)),
        };
        let event = ChatEvent::UserTyping {
            user: signal.user,
            chat_type,
            room,
            expires_in: TYPING_DISPLAY_TIMEOUT,
        };
        self.presence.send_to_many(signal.audience, &event).await;
    }
}
