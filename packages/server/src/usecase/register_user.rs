//! UseCase: ユーザー登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録成功で本人に歓迎メッセージ、全員に参加通知とアクティブユーザー一覧
//! - 異常系：使用中のユーザー名、登録済みの接続からの再登録
//! - エッジケース：非アクティブになったユーザー名の再登録

use std::sync::Arc;

use crate::domain::{ChatError, ChatEvent, ChatRepository, ConnectionId, MessagePusher, UserName};

use super::presence::PresenceDispatcher;

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
}

impl RegisterUserUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher),
            repository,
        }
    }

    /// ユーザー登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功（通知は送信済み）
    /// * `Err(ChatError)` - `NameTaken` / `AlreadyRegistered`
    pub async fn execute(&self, connection: ConnectionId, name: UserName) -> Result<(), ChatError> {
        self.repository
            .register_user(name.clone(), connection)
            .await?;
        tracing::info!("User '{}' registered on connection '{}'", name, connection);

        self.presence
            .send_to(&connection, &ChatEvent::registered(name.clone()))
            .await;
        self.presence
            .send_to_all(&ChatEvent::user_joined_chat(&name))
            .await;
        self.presence.broadcast_active_users().await;
        Ok(())
    }
}
