//! Conversion logic between DTOs and domain types.

use kaiwa_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatEvent, ChatMessage, ChatType, Intent, MessageContent, NotificationKind, Room, RoomName,
    RoomSummary, TypingScope, UserName, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::RoomDetailDto,
    websocket::{
        ChatTypeDto, ClientMessage, MessageDto, NotificationTypeDto, RoomSummaryDto, ServerMessage,
    },
};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ClientMessage> for Intent {
    type Error = ValueObjectError;

    fn try_from(dto: ClientMessage) -> Result<Self, Self::Error> {
        let intent = match dto {
            ClientMessage::Register { username } => Intent::Register {
                name: UserName::new(username)?,
            },
            ClientMessage::SendGroupMessage { message } => Intent::SendGroup {
                content: MessageContent::new(message)?,
            },
            ClientMessage::SendPrivateMessage { receiver, message } => Intent::SendPrivate {
                receiver: UserName::lookup(receiver)?,
                content: MessageContent::new(message)?,
            },
            ClientMessage::SendRoomMessage { room, message } => Intent::SendRoom {
                room: RoomName::new(room)?,
                content: MessageContent::new(message)?,
            },
            ClientMessage::CreateRoom {
                room_name,
                description,
            } => Intent::CreateRoom {
                name: RoomName::new(room_name)?,
                description,
            },
            ClientMessage::JoinRoom { room_name } => Intent::JoinRoom {
                name: RoomName::new(room_name)?,
            },
            ClientMessage::LeaveRoom { room_name } => Intent::LeaveRoom {
                name: RoomName::new(room_name)?,
            },
            ClientMessage::UserTyping {
                chat_type,
                receiver,
                room,
            } => {
                let scope = match chat_type {
                    ChatTypeDto::Group => TypingScope::Group,
                    ChatTypeDto::Private => TypingScope::Private(UserName::lookup(
                        receiver.ok_or(ValueObjectError::MissingField("receiver"))?,
                    )?),
                    ChatTypeDto::Room => TypingScope::Room(RoomName::new(
                        room.ok_or(ValueObjectError::MissingField("room"))?,
                    )?),
                };
                Intent::Typing { scope }
            }
            ClientMessage::GetGroupHistory => Intent::GetGroupHistory,
            ClientMessage::GetPrivateHistory { username } => Intent::GetPrivateHistory {
                other: UserName::lookup(username)?,
            },
            ClientMessage::GetRoomHistory { room_name } => Intent::GetRoomHistory {
                room: RoomName::new(room_name)?,
            },
            ClientMessage::GetActiveUsers => Intent::GetActiveUsers,
            ClientMessage::GetRoomsList => Intent::GetRoomsList,
            ClientMessage::Logout => Intent::Logout,
        };
        Ok(intent)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatType> for ChatTypeDto {
    fn from(chat_type: ChatType) -> Self {
        match chat_type {
            ChatType::Group => ChatTypeDto::Group,
            ChatType::Private => ChatTypeDto::Private,
            ChatType::Room => ChatTypeDto::Room,
        }
    }
}

impl From<NotificationKind> for NotificationTypeDto {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Join => NotificationTypeDto::Join,
            NotificationKind::Leave => NotificationTypeDto::Leave,
            NotificationKind::Room => NotificationTypeDto::Room,
        }
    }
}

impl From<&ChatMessage> for MessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            sender: model.sender.to_string(),
            receiver: model.recipient.as_ref().map(UserName::to_string),
            room: model.room.as_ref().map(RoomName::to_string),
            content: model.content.as_str().to_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
            read: model.read,
        }
    }
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(model: &RoomSummary) -> Self {
        Self {
            name: model.name.to_string(),
            description: model.description.clone(),
            member_count: model.member_count,
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(model: &Room) -> Self {
        Self {
            name: model.name.to_string(),
            description: model.description.clone(),
            members: model.members.iter().map(UserName::to_string).collect(),
            created_by: model.created_by.to_string(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

fn messages_to_dto(messages: &[ChatMessage]) -> Vec<MessageDto> {
    messages.iter().map(MessageDto::from).collect()
}

fn names_to_dto(names: &[UserName]) -> Vec<String> {
    names.iter().map(UserName::to_string).collect()
}

impl From<&ChatEvent> for ServerMessage {
    fn from(event: &ChatEvent) -> Self {
        match event {
            ChatEvent::RegistrationSuccessful { user, welcome } => {
                ServerMessage::RegistrationSuccessful {
                    username: user.to_string(),
                    message: welcome.clone(),
                }
            }
            ChatEvent::Error { code, message } => ServerMessage::ErrorMessage {
                code: code.to_string(),
                message: message.clone(),
            },
            ChatEvent::Notification { message, kind } => ServerMessage::ChatNotification {
                message: message.clone(),
                notification_type: (*kind).into(),
            },
            ChatEvent::ActiveUsers(users) => ServerMessage::ActiveUsers {
                users: names_to_dto(users),
            },
            ChatEvent::RoomsList(rooms) => ServerMessage::RoomsList {
                rooms: rooms.iter().map(RoomSummaryDto::from).collect(),
            },
            ChatEvent::GroupMessage(message) => ServerMessage::ReceiveGroupMessage {
                message: message.into(),
            },
            ChatEvent::PrivateMessage(message) => ServerMessage::ReceivePrivateMessage {
                message: message.into(),
            },
            ChatEvent::RoomMessage(message) => ServerMessage::ReceiveRoomMessage {
                message: message.into(),
            },
            ChatEvent::RoomCreated { room, description } => ServerMessage::RoomCreated {
                room_name: room.to_string(),
                description: description.clone(),
            },
            ChatEvent::RoomJoined {
                room,
                description,
                members,
            } => ServerMessage::RoomJoined {
                room_name: room.to_string(),
                description: description.clone(),
                members: names_to_dto(members),
            },
            ChatEvent::RoomLeft { room } => ServerMessage::RoomLeft {
                room_name: room.to_string(),
            },
            ChatEvent::RoomDeleted { room } => ServerMessage::RoomDeleted {
                room_name: room.to_string(),
            },
            ChatEvent::RoomNotification {
                room,
                message,
                kind,
            } => ServerMessage::RoomNotification {
                room: room.to_string(),
                message: message.clone(),
                notification_type: (*kind).into(),
            },
            ChatEvent::UserTyping {
                user,
                chat_type,
                room,
                expires_in,
            } => ServerMessage::UserTyping {
                username: user.to_string(),
                chat_type: (*chat_type).into(),
                room: room.as_ref().map(RoomName::to_string),
                expires_in_ms: u64::try_from(expires_in.as_millis()).unwrap_or(u64::MAX),
            },
            ChatEvent::GroupHistory(messages) => ServerMessage::GroupHistory {
                messages: messages_to_dto(messages),
            },
            ChatEvent::PrivateHistory { with, messages } => ServerMessage::PrivateHistory {
                username: with.to_string(),
                messages: messages_to_dto(messages),
            },
            ChatEvent::RoomHistory { room, messages } => ServerMessage::RoomHistory {
                room_name: room.to_string(),
                messages: messages_to_dto(messages),
            },
            ChatEvent::LoggedOut { user } => ServerMessage::LoggedOut {
                username: user.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::Timestamp;

    fn user(value: &str) -> UserName {
        UserName::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_register_dto_to_intent() {
        // テスト項目: register DTO が Intent に変換される
        // given (前提条件):
        let dto = ClientMessage::Register {
            username: " alice ".to_string(),
        };

        // when (操作):
        let intent = Intent::try_from(dto);

        // then (期待する結果):
        assert_eq!(intent, Ok(Intent::Register { name: user("alice") }));
    }

    #[test]
    fn test_short_name_is_rejected_before_reaching_core() {
        // テスト項目: 3 文字未満のユーザー名は Intent に変換できない
        // given (前提条件):
        let dto = ClientMessage::Register {
            username: "al".to_string(),
        };

        // when (操作):
        let intent = Intent::try_from(dto);

        // then (期待する結果):
        assert!(matches!(
            intent,
            Err(ValueObjectError::UserNameTooShort { .. })
        ));
    }

    #[test]
    fn test_lookup_names_are_not_length_checked() {
        // テスト項目: 宛先・履歴の相手の名前は登録時の長さ制限を受けずに Intent になる
        // given (前提条件):
        let send = ClientMessage::SendPrivateMessage {
            receiver: "al".to_string(),
            message: "hey".to_string(),
        };
        let history = ClientMessage::GetPrivateHistory {
            username: "al".to_string(),
        };
        let typing = ClientMessage::UserTyping {
            chat_type: ChatTypeDto::Private,
            receiver: Some("al".to_string()),
            room: None,
        };

        // when (操作):
        let send = Intent::try_from(send).unwrap();
        let history = Intent::try_from(history).unwrap();
        let typing = Intent::try_from(typing).unwrap();

        // then (期待する結果):
        let al = UserName::lookup("al".to_string()).unwrap();
        assert!(matches!(send, Intent::SendPrivate { receiver, .. } if receiver == al));
        assert_eq!(history, Intent::GetPrivateHistory { other: al.clone() });
        assert_eq!(
            typing,
            Intent::Typing {
                scope: TypingScope::Private(al)
            }
        );
    }

    #[test]
    fn test_private_typing_requires_receiver() {
        // テスト項目: private の入力中シグナルは receiver が必須
        // given (前提条件):
        let dto = ClientMessage::UserTyping {
            chat_type: ChatTypeDto::Private,
            receiver: None,
            room: None,
        };

        // when (操作):
        let intent = Intent::try_from(dto);

        // then (期待する結果):
        assert_eq!(intent, Err(ValueObjectError::MissingField("receiver")));
    }

    #[test]
    fn test_room_typing_dto_to_intent() {
        // テスト項目: room の入力中シグナルがルームスコープに変換される
        // given (前提条件):
        let dto = ClientMessage::UserTyping {
            chat_type: ChatTypeDto::Room,
            receiver: None,
            room: Some("rust".to_string()),
        };

        // when (操作):
        let intent = Intent::try_from(dto).unwrap();

        // then (期待する結果):
        assert_eq!(
            intent,
            Intent::Typing {
                scope: TypingScope::Room(RoomName::new("rust".to_string()).unwrap())
            }
        );
    }

    #[test]
    fn test_private_message_event_to_dto() {
        // テスト項目: 個人メッセージイベントが DTO に変換される
        // given (前提条件):
        let message = ChatMessage::private(
            user("alice"),
            user("bob"),
            MessageContent::new("hey".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        let event = ChatEvent::PrivateMessage(message);

        // when (操作):
        let dto = ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerMessage::ReceivePrivateMessage {
                message: MessageDto {
                    sender: "alice".to_string(),
                    receiver: Some("bob".to_string()),
                    room: None,
                    content: "hey".to_string(),
                    timestamp: "2023-01-01T00:00:00.000Z".to_string(),
                    read: false,
                }
            }
        );
    }

    #[test]
    fn test_typing_event_to_dto() {
        // テスト項目: 入力中イベントの期限がミリ秒で出力される
        // given (前提条件):
        let event = ChatEvent::UserTyping {
            user: user("alice"),
            chat_type: ChatType::Room,
            room: Some(RoomName::new("rust".to_string()).unwrap()),
            expires_in: Duration::from_secs(3),
        };

        // when (操作):
        let dto = ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto,
            ServerMessage::UserTyping {
                username: "alice".to_string(),
                chat_type: ChatTypeDto::Room,
                room: Some("rust".to_string()),
                expires_in_ms: 3000,
            }
        );
    }

    #[test]
    fn test_room_to_detail_dto() {
        // テスト項目: Room エンティティが詳細 DTO に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomName::new("rust".to_string()).unwrap(),
            "Rustaceans".to_string(),
            user("alice"),
            Timestamp::new(1672531200000),
        );
        room.members.insert(user("bob"));
        room.members.insert(user("alice"));

        // when (操作):
        let dto = RoomDetailDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.members, vec!["alice", "bob"]);
        assert_eq!(dto.created_by, "alice");
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }
}
