//! Message Router
//!
//! 接続から届いた Intent を対応するユースケースに振り分けます。
//! 失敗はすべて要求元の接続にだけ `error_message` として返し、接続はそのまま使えます。

use std::sync::Arc;

use kaiwa_shared::time::Clock;

use crate::domain::{
    ChatError, ChatEvent, ChatRepository, ConnectionId, Intent, MessagePusher, PusherChannel,
    ValueObjectError,
};

use super::{
    create_room::CreateRoomUseCase, disconnect_user::DisconnectUserUseCase,
    get_active_users::GetActiveUsersUseCase, get_history::GetHistoryUseCase,
    get_rooms::GetRoomsUseCase, join_room::JoinRoomUseCase, leave_room::LeaveRoomUseCase,
    notify_typing::NotifyTypingUseCase, presence::PresenceDispatcher,
    register_user::RegisterUserUseCase, send_message::SendMessageUseCase,
};

/// Intent の振り分け先
pub struct ChatRouter {
    message_pusher: Arc<dyn MessagePusher>,
    presence: PresenceDispatcher,
    register_user: RegisterUserUseCase,
    send_message: SendMessageUseCase,
    create_room: CreateRoomUseCase,
    join_room: JoinRoomUseCase,
    leave_room: LeaveRoomUseCase,
    notify_typing: NotifyTypingUseCase,
    get_history: GetHistoryUseCase,
    get_active_users: GetActiveUsersUseCase,
    get_rooms: GetRoomsUseCase,
    disconnect_user: DisconnectUserUseCase,
}

impl ChatRouter {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            presence: PresenceDispatcher::new(repository.clone(), message_pusher.clone()),
            register_user: RegisterUserUseCase::new(repository.clone(), message_pusher.clone()),
            send_message: SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            create_room: CreateRoomUseCase::new(repository.clone(), message_pusher.clone(), clock),
            join_room: JoinRoomUseCase::new(repository.clone(), message_pusher.clone()),
            leave_room: LeaveRoomUseCase::new(repository.clone(), message_pusher.clone()),
            notify_typing: NotifyTypingUseCase::new(repository.clone(), message_pusher.clone()),
            get_history: GetHistoryUseCase::new(repository.clone(), message_pusher.clone()),
            get_active_users: GetActiveUsersUseCase::new(repository.clone()),
            get_rooms: GetRoomsUseCase::new(repository.clone()),
            disconnect_user: DisconnectUserUseCase::new(repository, message_pusher.clone()),
            message_pusher,
        }
    }

    /// 新しい接続の送信チャンネルを登録
    pub async fn connect(&self, connection: ConnectionId, sender: PusherChannel) {
        self.message_pusher.register_client(connection, sender).await;
        tracing::info!("Connection '{}' opened", connection);
    }

    /// 接続の後始末（ログアウトと同じ処理 + 送信チャンネルの破棄）
    pub async fn disconnect(&self, connection: ConnectionId) {
        self.disconnect_user.disconnect(&connection).await;
        tracing::info!("Connection '{}' closed", connection);
    }

    /// 検証に失敗した入力を要求元に返す
    pub async fn reject(&self, connection: ConnectionId, error: ValueObjectError) {
        tracing::warn!("Rejected input from '{}': {}", connection, error);
        self.presence
            .send_to(&connection, &ChatEvent::from_invalid_input(&error))
            .await;
    }

    /// Intent を処理する
    pub async fn handle(&self, connection: ConnectionId, intent: Intent) {
        let kind = intent.kind();
        tracing::debug!("Handling '{}' from '{}'", kind, connection);
        if let Err(e) = self.dispatch(&connection, intent).await {
            tracing::warn!("'{}' from '{}' failed: {}", kind, connection, e);
            self.presence
                .send_to(&connection, &ChatEvent::from_error(&e))
                .await;
        }
    }

    async fn dispatch(&self, connection: &ConnectionId, intent: Intent) -> Result<(), ChatError> {
        match intent {
            Intent::Register { name } => self.register_user.execute(*connection, name).await,
            Intent::SendGroup { content } => self.send_message.send_group(connection, content).await,
            Intent::SendPrivate { receiver, content } => {
                self.send_message
                    .send_private(connection, receiver, content)
                    .await
            }
            Intent::SendRoom { room, content } => {
                self.send_message.send_room(connection, room, content).await
            }
            Intent::CreateRoom { name, description } => {
                self.create_room
                    .execute(connection, name, description)
                    .await
            }
            Intent::JoinRoom { name } => self.join_room.execute(connection, name).await,
            Intent::LeaveRoom { name } => self.leave_room.execute(connection, name).await,
            Intent::Typing { scope } => {
                self.notify_typing.execute(connection, scope).await;
                Ok(())
            }
            Intent::GetGroupHistory => {
                self.get_history.group(connection).await;
                Ok(())
            }
            Intent::GetPrivateHistory { other } => {
                self.get_history.private(connection, other).await
            }
            Intent::GetRoomHistory { room } => self.get_history.room(connection, room).await,
            Intent::GetActiveUsers => {
                let users = self.get_active_users.execute().await;
                self.presence
                    .send_to(connection, &ChatEvent::ActiveUsers(users))
                    .await;
                Ok(())
            }
            Intent::GetRoomsList => {
                let rooms = self.get_rooms.execute().await;
                self.presence
                    .send_to(connection, &ChatEvent::RoomsList(rooms))
                    .await;
                Ok(())
            }
            Intent::Logout => self.disconnect_user.logout(connection).await,
        }
    }
}
