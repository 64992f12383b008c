//! Room Directory: room lifecycle and membership sets.

use std::collections::BTreeMap;

use super::{
    entity::{Room, RoomSummary},
    error::ChatError,
    value_object::{RoomName, Timestamp, UserName},
};

/// Name of the room that always exists
pub const RESERVED_ROOM: &str = "general";
pub const RESERVED_ROOM_DESCRIPTION: &str = "General chat room for everyone";
pub const SYSTEM_USER: &str = "system";

/// Result of removing a member from a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRemoval {
    /// Members left behind, in name order
    pub remaining: Vec<UserName>,
    /// The room became empty and was destroyed
    pub deleted: bool,
}

#[derive(Debug, Clone)]
pub struct RoomDirectory {
    rooms: BTreeMap<RoomName, Room>,
    reserved: RoomName,
}

impl RoomDirectory {
    /// Directory holding only the reserved room
    pub fn with_reserved_room(reserved: Room) -> Self {
        let name = reserved.name.clone();
        let mut rooms = BTreeMap::new();
        rooms.insert(name.clone(), reserved);
        Self {
            rooms,
            reserved: name,
        }
    }

    pub fn is_reserved(&self, name: &RoomName) -> bool {
        &self.reserved == name
    }

    pub fn contains(&self, name: &RoomName) -> bool {
        self.rooms.contains_key(name)
    }

    pub fn get(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Create a room whose only member is `creator`
    pub fn create(
        &mut self,
        name: RoomName,
        description: String,
        creator: UserName,
        created_at: Timestamp,
    ) -> Result<(), ChatError> {
        if self.rooms.contains_key(&name) {
            return Err(ChatError::RoomExists(name.into_string()));
        }
        let mut room = Room::new(name.clone(), description, creator.clone(), created_at);
        room.members.insert(creator);
        self.rooms.insert(name, room);
        Ok(())
    }

    /// Add `user` to the members of `name`. Returns `false` if already a member.
    pub fn add_member(&mut self, name: &RoomName, user: UserName) -> Result<bool, ChatError> {
        let room = self
            .rooms
            .get_mut(name)
            .ok_or_else(|| ChatError::NoSuchRoom(name.to_string()))?;
        Ok(room.members.insert(user))
    }

    /// Remove `user` from `name`, destroying the room once empty unless reserved
    pub fn remove_member(
        &mut self,
        name: &RoomName,
        user: &UserName,
    ) -> Result<MemberRemoval, ChatError> {
        let room = self
            .rooms
            .get_mut(name)
            .ok_or_else(|| ChatError::NoSuchRoom(name.to_string()))?;
        if !room.members.remove(user) {
            return Err(ChatError::NotMember(name.to_string()));
        }

        let remaining: Vec<UserName> = room.members.iter().cloned().collect();
        let deleted = remaining.is_empty() && name != &self.reserved;
        if deleted {
            self.rooms.remove(name);
        }
        Ok(MemberRemoval { remaining, deleted })
    }

    /// Room list in name order
    pub fn list(&self) -> Vec<RoomSummary> {
        self.rooms.values().map(Room::summary).collect()
    }
}
