//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatTypeDto {
    Group,
    Private,
    Room,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTypeDto {
    Join,
    Leave,
    Room,
}

/// Client → server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Register {
        username: String,
    },
    SendGroupMessage {
        message: String,
    },
    SendPrivateMessage {
        receiver: String,
        message: String,
    },
    SendRoomMessage {
        room: String,
        message: String,
    },
    CreateRoom {
        room_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    JoinRoom {
        room_name: String,
    },
    LeaveRoom {
        room_name: String,
    },
    UserTyping {
        chat_type: ChatTypeDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },
    GetGroupHistory,
    GetPrivateHistory {
        username: String,
    },
    GetRoomHistory {
        room_name: String,
    },
    GetActiveUsers,
    GetRoomsList,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub content: String,
    /// ISO-8601 (UTC)
    pub timestamp: String,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub description: String,
    pub member_count: usize,
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    RegistrationSuccessful {
        username: String,
        message: String,
    },
    ErrorMessage {
        code: String,
        message: String,
    },
    ChatNotification {
        message: String,
        notification_type: NotificationTypeDto,
    },
    ActiveUsers {
        users: Vec<String>,
    },
    RoomsList {
        rooms: Vec<RoomSummaryDto>,
    },
    ReceiveGroupMessage {
        message: MessageDto,
    },
    ReceivePrivateMessage {
        message: MessageDto,
    },
    ReceiveRoomMessage {
        message: MessageDto,
    },
    RoomCreated {
        room_name: String,
        description: String,
    },
    RoomJoined {
        room_name: String,
        description: String,
        members: Vec<String>,
    },
    RoomLeft {
        room_name: String,
    },
    RoomDeleted {
        room_name: String,
    },
    RoomNotification {
        room: String,
        message: String,
        notification_type: NotificationTypeDto,
    },
    UserTyping {
        username: String,
        chat_type: ChatTypeDto,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
        expires_in_ms: u64,
    },
    GroupHistory {
        messages: Vec<MessageDto>,
    },
    PrivateHistory {
        username: String,
        messages: Vec<MessageDto>,
    },
    RoomHistory {
        room_name: String,
        messages: Vec<MessageDto>,
    },
    LoggedOut {
        username: String,
    },
}
