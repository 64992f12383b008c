//! Aggregate owning the Connection Registry, Room Directory and History Store.
//!
//! Every public method is one state transition: all checks run before the
//! first mutation, so a rejected call leaves the three stores untouched. The
//! returned outcome names the connections that must be told about the change.

use std::time::Instant;

use super::{
    conversation::ConversationKey,
    directory::{RESERVED_ROOM, RESERVED_ROOM_DESCRIPTION, RoomDirectory, SYSTEM_USER},
    entity::{ChatMessage, Room, RoomSummary},
    error::{ChatError, ValueObjectError},
    history::HistoryStore,
    registry::ConnectionRegistry,
    typing::{TypingScope, TypingTracker},
    value_object::{ConnectionId, MessageContent, RoomName, Timestamp, UserName},
};

/// A user removed from a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDeparture {
    pub user: UserName,
    pub room: RoomName,
    /// The room became empty and was destroyed
    pub deleted: bool,
    /// Connections of the members still in the room
    pub audience: Vec<ConnectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deactivation {
    pub user: UserName,
    pub departure: Option<RoomDeparture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCreation {
    pub creator: UserName,
    pub room: RoomName,
    pub description: String,
    /// Room the creator had to leave first
    pub departure: Option<RoomDeparture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomJoin {
    pub user: UserName,
    /// Snapshot of the joined room after the change
    pub room: Room,
    pub already_member: bool,
    /// Room the user had to leave first
    pub departure: Option<RoomDeparture>,
    /// Connections of every member of the joined room, joiner included
    pub audience: Vec<ConnectionId>,
}

/// A message appended to history and the connections it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message: ChatMessage,
    pub recipients: Vec<ConnectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    pub user: UserName,
    pub scope: TypingScope,
    pub audience: Vec<ConnectionId>,
}

#[derive(Debug, Clone)]
pub struct ChatState {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
    history: HistoryStore,
    typing: TypingTracker,
}

impl ChatState {
    /// Fresh state holding only the reserved room
    pub fn new(created_at: Timestamp) -> Result<Self, ValueObjectError> {
        let reserved = Room::new(
            RoomName::new(RESERVED_ROOM.to_string())?,
            RESERVED_ROOM_DESCRIPTION.to_string(),
            UserName::new(SYSTEM_USER.to_string())?,
            created_at,
        );
        Ok(Self {
            registry: ConnectionRegistry::new(),
            directory: RoomDirectory::with_reserved_room(reserved),
            history: HistoryStore::default(),
            typing: TypingTracker::new(),
        })
    }

    pub fn register(&mut self, name: UserName, connection: ConnectionId) -> Result<(), ChatError> {
        self.registry.register(name, connection)
    }

    pub fn resolve(&self, connection: &ConnectionId) -> Result<UserName, ChatError> {
        self.registry.resolve(connection)
    }

    /// Release room membership, then mark the user bound to `connection` inactive
    pub fn deactivate(&mut self, connection: &ConnectionId) -> Result<Deactivation, ChatError> {
        let user = self.registry.resolve(connection)?;
        let departure = match self.registry.current_room(&user).cloned() {
            Some(room) => Some(self.depart(&user, &room)?),
            None => None,
        };
        self.registry.deactivate(&user);
        self.typing.clear_user(&user);
        Ok(Deactivation { user, departure })
    }

    pub fn create_room(
        &mut self,
        connection: &ConnectionId,
        name: RoomName,
        description: Option<String>,
        created_at: Timestamp,
    ) -> Result<RoomCreation, ChatError> {
        let creator = self.registry.resolve(connection)?;
        if self.directory.contains(&name) {
            return Err(ChatError::RoomExists(name.into_string()));
        }
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} chat room", name));

        let departure = self.leave_current_room(&creator)?;
        self.directory.create(
            name.clone(),
            description.clone(),
            creator.clone(),
            created_at,
        )?;
        self.history.purge(&ConversationKey::room(name.clone()));
        self.registry.set_current_room(&creator, Some(name.clone()));

        Ok(RoomCreation {
            creator,
            room: name,
            description,
            departure,
        })
    }

    /// Join `name`, leaving the current room first when it differs.
    ///
    /// Joining the room the user is already in changes nothing.
    pub fn join_room(
        &mut self,
        connection: &ConnectionId,
        name: RoomName,
    ) -> Result<RoomJoin, ChatError> {
        let user = self.registry.resolve(connection)?;
        if !self.directory.contains(&name) {
            return Err(ChatError::NoSuchRoom(name.into_string()));
        }

        let already_member = self.registry.current_room(&user) == Some(&name);
        let departure = if already_member {
            None
        } else {
            let departure = self.leave_current_room(&user)?;
            self.directory.add_member(&name, user.clone())?;
            self.registry.set_current_room(&user, Some(name.clone()));
            departure
        };

        let room = self
            .directory
            .get(&name)
            .cloned()
            .ok_or_else(|| ChatError::NoSuchRoom(name.to_string()))?;
        let members: Vec<UserName> = room.members.iter().cloned().collect();
        let audience = self.connections_of(&members);

        Ok(RoomJoin {
            user,
            room,
            already_member,
            departure,
            audience,
        })
    }

    pub fn leave_room(
        &mut self,
        connection: &ConnectionId,
        name: &RoomName,
    ) -> Result<RoomDeparture, ChatError> {
        let user = self.registry.resolve(connection)?;
        self.depart(&user, name)
    }

    /// Group send: every active connection receives the message
    pub fn post_group(
        &mut self,
        connection: &ConnectionId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let sender = self.registry.resolve(connection)?;
        let message = ChatMessage::group(sender, content, timestamp);
        self.history.append(ConversationKey::Group, message.clone());
        Ok(Delivery {
            message,
            recipients: self.registry.active_connections(),
        })
    }

    /// Private send: sender and receiver both receive the message
    pub fn post_private(
        &mut self,
        connection: &ConnectionId,
        receiver: UserName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let sender = self.registry.resolve(connection)?;
        if self.registry.user(&receiver).is_none() {
            return Err(ChatError::UnknownUser(receiver.into_string()));
        }
        let receiver_connection = self
            .registry
            .connection_of(&receiver)
            .ok_or_else(|| ChatError::UserOffline(receiver.to_string()))?;

        let key = ConversationKey::private(sender.clone(), receiver.clone());
        let message = ChatMessage::private(sender, receiver, content, timestamp);
        self.history.append(key, message.clone());

        let mut recipients = vec![*connection, receiver_connection];
        recipients.sort();
        recipients.dedup();
        Ok(Delivery {
            message,
            recipients,
        })
    }

    /// Room send: members of the room receive the message.
    ///
    /// The sender does not have to be a member.
    pub fn post_room(
        &mut self,
        connection: &ConnectionId,
        room: RoomName,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Result<Delivery, ChatError> {
        let sender = self.registry.resolve(connection)?;
        let members: Vec<UserName> = match self.directory.get(&room) {
            Some(found) => found.members.iter().cloned().collect(),
            None => return Err(ChatError::NoSuchRoom(room.into_string())),
        };

        let message = ChatMessage::in_room(sender, room.clone(), content, timestamp);
        self.history
            .append(ConversationKey::room(room), message.clone());
        Ok(Delivery {
            message,
            recipients: self.connections_of(&members),
        })
    }

    pub fn group_history(&self) -> Vec<ChatMessage> {
        self.history.get(&ConversationKey::Group)
    }

    pub fn private_history(
        &self,
        connection: &ConnectionId,
        other: UserName,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let user = self.registry.resolve(connection)?;
        Ok(self.history.get(&ConversationKey::private(user, other)))
    }

    pub fn room_history(&self, room: &RoomName) -> Result<Vec<ChatMessage>, ChatError> {
        if !self.directory.contains(room) {
            return Err(ChatError::NoSuchRoom(room.to_string()));
        }
        Ok(self.history.get(&ConversationKey::room(room.clone())))
    }

    /// Record a typing intent and compute its audience.
    ///
    /// Returns `None` when the signal is dropped: unregistered sender,
    /// offline receiver, missing room, or a resend inside the gate.
    pub fn record_typing(
        &mut self,
        connection: &ConnectionId,
        scope: TypingScope,
        now: Instant,
    ) -> Option<TypingSignal> {
        let user = self.registry.resolve(connection).ok()?;
        let audience: Vec<ConnectionId> = match &scope {
            TypingScope::Group => self
                .registry
                .active_connections()
                .into_iter()
                .filter(|c| c != connection)
                .collect(),
            TypingScope::Private(receiver) => {
                vec![self.registry.connection_of(receiver)?]
            }
            TypingScope::Room(room) => {
                let members: Vec<UserName> = self
                    .directory
                    .get(room)?
                    .members
                    .iter()
                    .filter(|member| *member != &user)
                    .cloned()
                    .collect();
                self.connections_of(&members)
            }
        };

        if !self.typing.record(user.clone(), scope.clone(), now) {
            return None;
        }
        Some(TypingSignal {
            user,
            scope,
            audience,
        })
    }

    pub fn typists(&self, scope: &TypingScope, now: Instant) -> Vec<UserName> {
        self.typing.typists(scope, now)
    }

    pub fn active_users(&self) -> Vec<UserName> {
        self.registry.list_active()
    }

    pub fn active_connections(&self) -> Vec<ConnectionId> {
        self.registry.active_connections()
    }

    pub fn rooms(&self) -> Vec<RoomSummary> {
        self.directory.list()
    }

    pub fn room(&self, name: &RoomName) -> Option<Room> {
        self.directory.get(name).cloned()
    }

    fn leave_current_room(&mut self, user: &UserName) -> Result<Option<RoomDeparture>, ChatError> {
        match self.registry.current_room(user).cloned() {
            Some(room) => Ok(Some(self.depart(user, &room)?)),
            None => Ok(None),
        }
    }

    fn depart(&mut self, user: &UserName, room: &RoomName) -> Result<RoomDeparture, ChatError> {
        let removal = self.directory.remove_member(room, user)?;
        if self.registry.current_room(user) == Some(room) {
            self.registry.set_current_room(user, None);
        }
        if removal.deleted {
            self.history.purge(&ConversationKey::room(room.clone()));
        }
        Ok(RoomDeparture {
            user: user.clone(),
            room: room.clone(),
            deleted: removal.deleted,
            audience: self.connections_of(&removal.remaining),
        })
    }

    fn connections_of(&self, users: &[UserName]) -> Vec<ConnectionId> {
        users
            .iter()
            .filter_map(|user| self.registry.connection_of(user))
            .collect()
    }
}
