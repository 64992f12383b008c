//! UseCase: ログアウト・切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::logout() / disconnect() メソッド
//! - 非アクティブ化に伴うルーム退出・プレゼンス通知
//!
//! ### なぜこのテストが必要か
//! - 切断はログアウトと同じ後始末を行う必要がある
//! - ルームからの退出通知はメンバー記録を消す前にルーム名を使って送られる
//!
//! ### どのような状況を想定しているか
//! - 正常系：ログアウト、ルーム参加中の切断
//! - エッジケース：唯一のメンバーだったルームの削除、未登録の接続の切断

use std::sync::Arc;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, Deactivation, DepartureReason,
    MessagePusher,
};

use super::presence::PresenceDispatcher;

/// ログアウト・切断のユースケース
pub struct DisconnectUserUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: PresenceDispatcher,
}

impl DisconnectUserUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher.clone()),
            repository,
            message_pusher,
        }
    }

    /// 明示的なログアウト
    ///
    /// 接続は開いたまま残り、別の名前で再登録できる。
    pub async fn logout(&self, connection: &ConnectionId) -> Result<(), ChatError> {
        let deactivation = self.repository.deactivate_user(connection).await?;
        tracing::info!("User '{}' logged out", deactivation.user);

        self.presence
            .send_to(
                connection,
                &ChatEvent::LoggedOut {
                    user: deactivation.user.clone(),
                },
            )
            .await;
        self.announce(
            &deactivation,
            DepartureReason::Left,
            ChatEvent::user_logged_out(&deactivation.user),
            Some(connection),
        )
        .await;
        Ok(())
    }

    /// 接続の切断
    ///
    /// 登録済みならログアウトと同じ後始末を行い、最後に送信チャンネルを破棄する。
    pub async fn disconnect(&self, connection: &ConnectionId) {
        match self.repository.deactivate_user(connection).await {
            Ok(deactivation) => {
                tracing::info!("User '{}' disconnected", deactivation.user);
                self.announce(
                    &deactivation,
                    DepartureReason::Disconnected,
                    ChatEvent::user_went_offline(&deactivation.user),
                    None,
                )
                .await;
            }
            Err(_) => {
                tracing::debug!("Unregistered connection '{}' closed", connection);
            }
        }
        self.message_pusher.unregister_client(connection).await;
    }

    /// `still_open` is the leaver's socket when it stays connected (logout);
    /// it receives the global notice and lists alongside the active users.
    async fn announce(
        &self,
        deactivation: &Deactivation,
        reason: DepartureReason,
        notice: ChatEvent,
        still_open: Option<&ConnectionId>,
    ) {
        if let Some(departure) = &deactivation.departure {
            self.presence.announce_departure(departure, reason).await;
        }

        let mut audience = self.repository.active_connections().await;
        audience.extend(still_open.copied());
        self.presence.send_to_many(audience.clone(), &notice).await;

        let users = self.repository.active_users().await;
        self.presence
            .send_to_many(audience.clone(), &ChatEvent::ActiveUsers(users))
            .await;
        if deactivation.departure.is_some() {
            let rooms = self.repository.rooms().await;
            self.presence
                .send_to_many(audience, &ChatEvent::RoomsList(rooms))
                .await;
        }
    }
}
