//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::time::Instant;

use async_trait::async_trait;

use super::{
    ChatError, ChatMessage, ConnectionId, MessageContent, Room, RoomName, RoomSummary, Timestamp,
    TypingScope, UserName,
    chat_state::{Deactivation, Delivery, RoomCreation, RoomDeparture, RoomJoin, TypingSignal},
};

/// Chat Repository trait
///
/// Connection Registry・Room Directory・History Store をまとめて扱うインターフェース。
/// 各メソッドは 1 つのクリティカルセクション内で完結し、失敗した場合は状態を一切変更しない。
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// ユーザー名を接続に紐付ける
    async fn register_user(
        &self,
        name: UserName,
        connection: ConnectionId,
    ) -> Result<(), ChatError>;

    /// 接続に紐付いたユーザー名を取得
    async fn resolve(&self, connection: &ConnectionId) -> Result<UserName, ChatError>;

    /// ルームから退出させたうえでユーザーを非アクティブにする
    async fn deactivate_user(&self, connection: &ConnectionId) -> Result<Deactivation, ChatError>;

    /// ルームを作成
    async fn create_room(
        &self,
        connection: &ConnectionId,
        name: RoomName,
        description: Option<String>,
        created_at: Timestamp,
    ) -> Result<RoomCreation, ChatError>;

    /// ルームに参加（別ルームにいる場合は先に退出）
    async fn join_room(
        &self,
        connection: &ConnectionId,
        name: RoomName,
    ) -> Result<RoomJoin, ChatError>;

    /// ルームから退出
    async fn leave_room(
        &self,
        connection: &ConnectionId,
        name: &RoomName,
    ) -> Result<RoomDeparture, ChatError>;

    /// グループメッセージを履歴に追加
    async fn post_group_message(
        &self,
        connection: &ConnectionId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError>;

    /// 個人メッセージを履歴に追加
    async fn post_private_message(
        &self,
        connection: &ConnectionId,
        receiver: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError>;

    /// ルームメッセージを履歴に追加
    async fn post_room_message(
        &self,
        connection: &ConnectionId,
        room: RoomName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError>;

    /// グループチャットの履歴を取得
    async fn group_history(&self) -> Vec<ChatMessage>;

    /// 個人チャットの履歴を取得
    async fn private_history(
        &self,
        connection: &ConnectionId,
        other: UserName,
    ) -> Result<Vec<ChatMessage>, ChatError>;

    /// ルームチャットの履歴を取得
    async fn room_history(&self, room: &RoomName) -> Result<Vec<ChatMessage>, ChatError>;

    /// 入力中シグナルを記録し、通知対象を返す
    async fn record_typing(
        &self,
        connection: &ConnectionId,
        scope: TypingScope,
        now: Instant,
    ) -> Option<TypingSignal>;

    /// アクティブなユーザー名の一覧を取得
    async fn active_users(&self) -> Vec<UserName>;

    /// アクティブなユーザーの接続一覧を取得
    async fn active_connections(&self) -> Vec<ConnectionId>;

    /// ルーム一覧を取得
    async fn rooms(&self) -> Vec<RoomSummary>;

    /// ルームを取得
    async fn room(&self, name: &RoomName) -> Option<Room>;
}
