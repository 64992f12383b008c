//! Outbound events produced by the core.

use std::time::Duration;

use super::{
    entity::{ChatMessage, RoomSummary},
    error::{ChatError, ValueObjectError},
    value_object::{RoomName, UserName},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Join,
    Leave,
    Room,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Group,
    Private,
    Room,
}

/// Why a user left a room; changes the wording of the room notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureReason {
    Left,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    RegistrationSuccessful {
        user: UserName,
        welcome: String,
    },
    Error {
        code: &'static str,
        message: String,
    },
    Notification {
        message: String,
        kind: NotificationKind,
    },
    ActiveUsers(Vec<UserName>),
    RoomsList(Vec<RoomSummary>),
    GroupMessage(ChatMessage),
    PrivateMessage(ChatMessage),
    RoomMessage(ChatMessage),
    RoomCreated {
        room: RoomName,
        description: String,
    },
    RoomJoined {
        room: RoomName,
        description: String,
        members: Vec<UserName>,
    },
    RoomLeft {
        room: RoomName,
    },
    RoomDeleted {
        room: RoomName,
    },
    RoomNotification {
        room: RoomName,
        message: String,
        kind: NotificationKind,
    },
    UserTyping {
        user: UserName,
        chat_type: ChatType,
        room: Option<RoomName>,
        expires_in: Duration,
    },
    GroupHistory(Vec<ChatMessage>),
    PrivateHistory {
        with: UserName,
        messages: Vec<ChatMessage>,
    },
    RoomHistory {
        room: RoomName,
        messages: Vec<ChatMessage>,
    },
    LoggedOut {
        user: UserName,
    },
}

impl ChatEvent {
    pub fn registered(user: UserName) -> Self {
        let welcome = format!("Welcome {}, you are now registered!", user);
        ChatEvent::RegistrationSuccessful { user, welcome }
    }

    pub fn from_error(error: &ChatError) -> Self {
        ChatEvent::Error {
            code: error.code(),
            message: error.to_string(),
        }
    }

    pub fn from_invalid_input(error: &ValueObjectError) -> Self {
        ChatEvent::Error {
            code: error.code(),
            message: error.to_string(),
        }
    }

    pub fn user_joined_chat(user: &UserName) -> Self {
        ChatEvent::Notification {
            message: format!("{} joined the chat!", user),
            kind: NotificationKind::Join,
        }
    }

    pub fn user_logged_out(user: &UserName) -> Self {
        ChatEvent::Notification {
            message: format!("{} logged out.", user),
            kind: NotificationKind::Leave,
        }
    }

    pub fn user_went_offline(user: &UserName) -> Self {
        ChatEvent::Notification {
            message: format!("{} went offline.", user),
            kind: NotificationKind::Leave,
        }
    }

    pub fn room_created_notice(creator: &UserName, room: &RoomName) -> Self {
        ChatEvent::Notification {
            message: format!("{} created room: {}", creator, room),
            kind: NotificationKind::Room,
        }
    }

    pub fn member_joined(room: &RoomName, user: &UserName) -> Self {
        ChatEvent::RoomNotification {
            room: room.clone(),
            message: format!("{} joined the room", user),
            kind: NotificationKind::Join,
        }
    }

    pub fn member_left(room: &RoomName, user: &UserName, reason: DepartureReason) -> Self {
        let message = match reason {
            DepartureReason::Left => format!("{} left the room", user),
            DepartureReason::Disconnected => format!("{} disconnected and left the room", user),
        };
        ChatEvent::RoomNotification {
            room: room.clone(),
            message,
            kind: NotificationKind::Leave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(value: &str) -> UserName {
        UserName::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_registered_carries_welcome_text() {
        // テスト項目: 登録成功イベントに歓迎メッセージが含まれる
        // given (前提条件):
        let alice = user("alice");

        // when (操作):
        let event = ChatEvent::registered(alice.clone());

        // then (期待する結果):
        assert_eq!(
            event,
            ChatEvent::RegistrationSuccessful {
                user: alice,
                welcome: "Welcome alice, you are now registered!".to_string(),
            }
        );
    }

    #[test]
    fn test_member_left_wording_depends_on_reason() {
        // テスト項目: 退出理由によってルーム通知の文言が変わる
        // given (前提条件):
        let room = RoomName::new("rust".to_string()).unwrap();
        let bob = user("bob");

        // when (操作):
        let left = ChatEvent::member_left(&room, &bob, DepartureReason::Left);
        let dropped = ChatEvent::member_left(&room, &bob, DepartureReason::Disconnected);

        // then (期待する結果):
        assert!(matches!(
            left,
            ChatEvent::RoomNotification { ref message, .. } if message == "bob left the room"
        ));
        assert!(matches!(
            dropped,
            ChatEvent::RoomNotification { ref message, .. }
                if message == "bob disconnected and left the room"
        ));
    }

    #[test]
    fn test_from_error_uses_code_and_message() {
        // テスト項目: ChatError からエラーイベントを生成できる
        // given (前提条件):
        let error = ChatError::NoSuchRoom("ghost".to_string());

        // when (操作):
        let event = ChatEvent::from_error(&error);

        // then (期待する結果):
        assert_eq!(
            event,
            ChatEvent::Error {
                code: "no_such_room",
                message: "Room ghost does not exist!".to_string(),
            }
        );
    }
}
