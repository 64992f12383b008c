//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! `ChatState` 集約を Mutex で保護し、各操作を 1 回のロック内で完結させます。

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatError, ChatMessage, ChatRepository, ChatState, ConnectionId, Deactivation, Delivery,
    MessageContent, Room, RoomCreation, RoomDeparture, RoomJoin, RoomName, RoomSummary, Timestamp,
    TypingScope, TypingSignal, UserName,
};

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    state: Arc<Mutex<ChatState>>,
}

impl InMemoryChatRepository {
    pub fn new(state: Arc<Mutex<ChatState>>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn register_user(
        &self,
        name: UserName,
        connection: ConnectionId,
    ) -> Result<(), ChatError> {
        let mut state = self.state.lock().await;
        state.register(name, connection)
    }

    async fn resolve(&self, connection: &ConnectionId) -> Result<UserName, ChatError> {
        let state = self.state.lock().await;
        state.resolve(connection)
    }

    async fn deactivate_user(&self, connection: &ConnectionId) -> Result<Deactivation, ChatError> {
        let mut state = self.state.lock().await;
        state.deactivate(connection)
    }

    async fn create_room(
        &self,
        connection: &ConnectionId,
        name: RoomName,
        description: Option<String>,
        created_at: Timestamp,
    ) -> Result<RoomCreation, ChatError> {
        let mut state = self.state.lock().await;
        state.create_room(connection, name, description, created_at)
    }

    async fn join_room(
        &self,
        connection: &ConnectionId,
        name: RoomName,
    ) -> Result<RoomJoin, ChatError> {
        let mut state = self.state.lock().await;
        state.join_room(connection, name)
    }

    async fn leave_room(
        &self,
        connection: &ConnectionId,
        name: &RoomName,
    ) -> Result<RoomDeparture, ChatError> {
        let mut state = self.state.lock().await;
        state.leave_room(connection, name)
    }

    async fn post_group_message(
        &self,
        connection: &ConnectionId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let mut state = self.state.lock().await;
        state.post_group(connection, content, timestamp)
    }

    async fn post_private_message(
        &self,
        connection: &ConnectionId,
        receiver: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let mut state = self.state.lock().await;
        state.post_private(connection, receiver, content, timestamp)
    }

    async fn post_room_message(
        &self,
        connection: &ConnectionId,
        room: RoomName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let mut state = self.state.lock().await;
        state.post_room(connection, room, content, timestamp)
    }

    async fn group_history(&self) -> Vec<ChatMessage> {
        let state = self.state.lock().await;
        state.group_history()
    }

    async fn private_history(
        &self,
        connection: &ConnectionId,
        other: UserName,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let state = self.state.lock().await;
        state.private_history(connection, other)
    }

    async fn room_history(&self, room: &RoomName) -> Result<Vec<ChatMessage>, ChatError> {
        let state = self.state.lock().await;
        state.room_history(room)
    }

    async fn record_typing(
        &self,
        connection: &ConnectionId,
        scope: TypingScope,
        now: Instant,
    ) -> Option<TypingSignal> {
        let mut state = self.state.lock().await;
        state.record_typing(connection, scope, now)
    }

    async fn active_users(&self) -> Vec<UserName> {
        let state = self.state.lock().await;
        state.active_users()
    }

    async fn active_connections(&self) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state.active_connections()
    }

    async fn rooms(&self) -> Vec<RoomSummary> {
        let state = self.state.lock().await;
        state.rooms()
    }

    async fn room(&self, name: &RoomName) -> Option<Room> {
        let state = self.state.lock().await;
        state.room(name)
    }
}
