//! Validated client intents.

use super::{
    typing::TypingScope,
    value_object::{MessageContent, RoomName, UserName},
};

/// One request from a connection, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Register {
        name: UserName,
    },
    SendGroup {
        content: MessageContent,
    },
    SendPrivate {
        receiver: UserName,
        content: MessageContent,
    },
    SendRoom {
        room: RoomName,
        content: MessageContent,
    },
    CreateRoom {
        name: RoomName,
        description: Option<String>,
    },
    JoinRoom {
        name: RoomName,
    },
    LeaveRoom {
        name: RoomName,
    },
    Typing {
        scope: TypingScope,
    },
    GetGroupHistory,
    GetPrivateHistory {
        other: UserName,
    },
    GetRoomHistory {
        room: RoomName,
    },
    GetActiveUsers,
    GetRoomsList,
    Logout,
}

impl Intent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Register { .. } => "register",
            Intent::SendGroup { .. } => "send_group",
            Intent::SendPrivate { .. } => "send_private",
            Intent::SendRoom { .. } => "send_room",
            Intent::CreateRoom { .. } => "create_room",
            Intent::JoinRoom { .. } => "join_room",
            Intent::LeaveRoom { .. } => "leave_room",
            Intent::Typing { .. } => "typing",
            Intent::GetGroupHistory => "get_group_history",
            Intent::GetPrivateHistory { .. } => "get_private_history",
            Intent::GetRoomHistory { .. } => "get_room_history",
            Intent::GetActiveUsers => "get_active_users",
            Intent::GetRoomsList => "get_rooms_list",
            Intent::Logout => "logout",
        }
    }
}
