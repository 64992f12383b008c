//! Entities of the chat domain.

use std::collections::BTreeSet;

use super::value_object::{ConnectionId, MessageContent, RoomName, Timestamp, UserName};

/// A registered user.
///
/// Records are never deleted: deactivation only clears `active` and the
/// connection binding, so a later registration under the same name picks up
/// the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: UserName,
    pub connection: Option<ConnectionId>,
    pub active: bool,
    pub current_room: Option<RoomName>,
}

impl User {
    pub fn new(name: UserName, connection: ConnectionId) -> Self {
        Self {
            name,
            connection: Some(connection),
            active: true,
            current_room: None,
        }
    }
}

/// A named room and its member set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    pub description: String,
    pub members: BTreeSet<UserName>,
    pub created_by: UserName,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(
        name: RoomName,
        description: String,
        created_by: UserName,
        created_at: Timestamp,
    ) -> Self {
        Self {
            name,
            description,
            members: BTreeSet::new(),
            created_by,
            created_at,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            member_count: self.members.len(),
        }
    }
}

/// Room list entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub name: RoomName,
    pub description: String,
    pub member_count: usize,
}

/// A message appended to a history stream.
///
/// `recipient` is set for private messages and `room` for room messages;
/// group messages carry neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: UserName,
    pub recipient: Option<UserName>,
    pub room: Option<RoomName>,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    pub read: bool,
}

impl ChatMessage {
    pub fn group(sender: UserName, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            sender,
            recipient: None,
            room: None,
            content,
            timestamp,
            read: false,
        }
    }

    pub fn private(
        sender: UserName,
        recipient: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            recipient: Some(recipient),
            ..Self::group(sender, content, timestamp)
        }
    }

    pub fn in_room(
        sender: UserName,
        room: RoomName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            room: Some(room),
            ..Self::group(sender, content, timestamp)
        }
    }
}
