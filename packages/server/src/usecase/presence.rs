//! Presence & Typing Dispatcher
//!
//! レジストリやルームの状態遷移に伴う通知（プレゼンス・ルーム一覧・退出通知）を
//! まとめて送信します。送信はキューへの投入のみで、失敗はログに残して握りつぶします。

use std::sync::Arc;

use crate::domain::{
    ChatEvent, ChatRepository, ConnectionId, DepartureReason, MessagePusher, RoomDeparture,
};

/// イベント送信の窓口
#[derive(Clone)]
pub struct PresenceDispatcher {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl PresenceDispatcher {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 1 つの接続にイベントを送信
    pub async fn send_to(&self, connection: &ConnectionId, event: &ChatEvent) {
        if let Err(e) = self.message_pusher.push_to(connection, event).await {
            tracing::warn!("Failed to push event to '{}': {}", connection, e);
        }
    }

    /// 指定した接続群にイベントを送信
    pub async fn send_to_many(&self, targets: Vec<ConnectionId>, event: &ChatEvent) {
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.message_pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to broadcast event: {}", e);
        }
    }

    /// アクティブな全接続にイベントを送信
    ///
    /// 対象は登録済みの接続のみ。未登録の接続は自分の要求への応答だけを受け取る。
    pub async fn send_to_all(&self, event: &ChatEvent) {
        let targets = self.repository.active_connections().await;
        self.send_to_many(targets, event).await;
    }

    pub async fn broadcast_active_users(&self) {
        let users = self.repository.active_users().await;
        self.send_to_all(&ChatEvent::ActiveUsers(users)).await;
    }

    pub async fn broadcast_rooms_list(&self) {
        let rooms = self.repository.rooms().await;
        self.send_to_all(&ChatEvent::RoomsList(rooms)).await;
    }

    /// ルーム退出を通知する
    ///
    /// ルームが削除された場合は全体に `RoomDeleted`、残っている場合は残りのメンバーに
    /// 退出通知を送る。
    pub async fn announce_departure(&self, departure: &RoomDeparture, reason: DepartureReason) {
        if departure.deleted {
            tracing::info!("Room '{}' is empty and was deleted", departure.room);
            self.send_to_all(&ChatEvent::RoomDeleted {
                room: departure.room.clone(),
            })
            .await;
        } else {
            let event = ChatEvent::member_left(&departure.room, &departure.user, reason);
            self.send_to_many(departure.audience.clone(), &event).await;
        }
    }
}
