//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成者に room_created、全員にルーム一覧と作成通知
//! - 正常系：別ルームにいる作成者はそのルームから退出する
//! - 異常系：既存のルーム名、未登録の接続

use std::sync::Arc;

use kaiwa_shared::time::Clock;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, DepartureReason, MessagePusher, RoomName,
    Timestamp,
};

use super::presence::PresenceDispatcher;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    presence: PresenceDispatcher,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
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

    /// ルーム作成を実行
    ///
    /// `description` が空の場合は `"{room} chat room"` が使われる。
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        name: RoomName,
        description: Option<String>,
    ) -> Result<(), ChatError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let creation = self
            .repository
            .create_room(connection, name, description, created_at)
            .await?;
        tracing::info!("Room '{}' created by '{}'", creation.room, creation.creator);

        if let Some(departure) = &creation.departure {
            self.presence
                .announce_departure(departure, DepartureReason::Left)
                .await;
        }
        self.presence
            .send_to(
                connection,
                &ChatEvent::RoomCreated {
                    room: creation.room.clone(),
                    description: creation.description.clone(),
                },
            )
            .await;
        self.presence.broadcast_rooms_list().await;
        self.presence
            .send_to_all(&ChatEvent::room_created_notice(
                &creation.creator,
                &creation.room,
            ))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kaiwa_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::RESERVED_ROOM,
        usecase::test_support::{
            connect, create_test_pusher, create_test_repository, drain, register, room, types,
            user,
        },
    };

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(1672531200000))
    }

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: 作成者に room_created、全員にルーム一覧と作成通知が届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        let (alice, mut alice_rx) = register(&repository, &pusher, "alice").await;
        let (_bob, mut bob_rx) = register(&repository, &pusher, "bob").await;
        let usecase = CreateRoomUseCase::new(repository.clone(), pusher.clone(), clock());

        // when (操作):
        let result = usecase.execute(&alice, room("rust"), None).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let events = drain(&mut alice_rx);
        assert_eq!(
            types(&events),
            vec!["room_created", "rooms_list", "chat_notification"]
        );
        assert_eq!(events[0]["room_name"], "rust");
        assert_eq!(events[0]["description"], "rust chat room");
        assert_eq!(events[2]["message"], "alice created room: rust");
        assert_eq!(events[2]["notification_type"], "room");

        let events = drain(&mut bob_rx);
        assert_eq!(types(&events), vec!["rooms_list", "chat_notification"]);

        let created = repository.room(&room("rust")).await.unwrap();
        assert_eq!(created.created_by, user("alice"));
        assert!(created.members.contains(&user("alice")));
    }

    #[tokio::test]
    async fn test_create_room_leaves_current_room() {
        // テスト項目: 別ルームにいる作成者はそのルームから退出し、残りのメンバーに通知される
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        let (alice, _alice_rx) = register(&repository, &pusher, "alice").await;
        let (bob, mut bob_rx) = register(&repository, &pusher, "bob").await;
        repository.join_room(&alice, room(RESERVED_ROOM)).await.unwrap();
        repository.join_room(&bob, room(RESERVED_ROOM)).await.unwrap();
        let usecase = CreateRoomUseCase::new(repository.clone(), pusher.clone(), clock());

        // when (操作):
        usecase
            .execute(&alice, room("rust"), Some("Rustaceans".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        let events = drain(&mut bob_rx);
        assert_eq!(
            types(&events),
            vec!["room_notification", "rooms_list", "chat_notification"]
        );
        assert_eq!(events[0]["message"], "alice left the room");
        let general = repository.room(&room(RESERVED_ROOM)).await.unwrap();
        assert!(!general.members.contains(&user("alice")));
    }

    #[tokio::test]
    async fn test_create_existing_room() {
        // テスト項目: 既存のルーム名での作成は RoomExists になる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        let (alice, mut alice_rx) = register(&repository, &pusher, "alice").await;
        let usecase = CreateRoomUseCase::new(repository.clone(), pusher.clone(), clock());

        // when (操作):
        let result = usecase.execute(&alice, room(RESERVED_ROOM), None).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ChatError::RoomExists(RESERVED_ROOM.to_string()))
        );
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(repository.rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_room_unregistered() {
        // テスト項目: 未登録の接続からのルーム作成は Unregistered になる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = create_test_pusher();
        let (stranger, _rx) = connect(&pusher).await;
        let usecase = CreateRoomUseCase::new(repository.clone(), pusher.clone(), clock());

        // when (操作):
        let result = usecase.execute(&stranger, room("rust"), None).await;

        // then (期待する結果):
        assert_eq!(result, Err(ChatError::Unregistered));
        assert!(repository.room(&room("rust")).await.is_none());
    }
}
