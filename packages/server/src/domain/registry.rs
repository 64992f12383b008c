//! Connection Registry: user name to connection binding and liveness.

use std::collections::HashMap;

use super::{
    directory::SYSTEM_USER,
    entity::User,
    error::ChatError,
    value_object::{ConnectionId, RoomName, UserName},
};

#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    users: HashMap<UserName, User>,
    bindings: HashMap<ConnectionId, UserName>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `connection`.
    ///
    /// Creates the record on first use and reactivates an inactive one.
    /// Fails while an active record with the same name exists, or when the
    /// connection is already bound to someone. The system account's name is
    /// never available.
    pub fn register(&mut self, name: UserName, connection: ConnectionId) -> Result<(), ChatError> {
        if let Some(bound) = self.bindings.get(&connection) {
            return Err(ChatError::AlreadyRegistered(bound.to_string()));
        }
        if name.as_str() == SYSTEM_USER {
            return Err(ChatError::NameTaken(name.into_string()));
        }
        if self.is_active(&name) {
            return Err(ChatError::NameTaken(name.into_string()));
        }

        match self.users.get_mut(&name) {
            Some(user) => {
                user.connection = Some(connection);
                user.active = true;
                user.current_room = None;
            }
            None => {
                self.users
                    .insert(name.clone(), User::new(name.clone(), connection));
            }
        }
        self.bindings.insert(connection, name);
        Ok(())
    }

    /// Name bound to `connection`
    pub fn resolve(&self, connection: &ConnectionId) -> Result<UserName, ChatError> {
        self.bindings
            .get(connection)
            .cloned()
            .ok_or(ChatError::Unregistered)
    }

    /// Mark `name` inactive and unbind its connection.
    ///
    /// Room membership must already have been released by the caller.
    /// Returns the connection that was bound, if any.
    pub fn deactivate(&mut self, name: &UserName) -> Option<ConnectionId> {
        let user = self.users.get_mut(name)?;
        user.active = false;
        let connection = user.connection.take();
        if let Some(connection) = &connection {
            self.bindings.remove(connection);
        }
        connection
    }

    pub fn user(&self, name: &UserName) -> Option<&User> {
        self.users.get(name)
    }

    pub fn is_active(&self, name: &UserName) -> bool {
        self.users.get(name).is_some_and(|user| user.active)
    }

    /// Connection of an active user
    pub fn connection_of(&self, name: &UserName) -> Option<ConnectionId> {
        self.users
            .get(name)
            .filter(|user| user.active)
            .and_then(|user| user.connection)
    }

    pub fn current_room(&self, name: &UserName) -> Option<&RoomName> {
        self.users.get(name).and_then(|user| user.current_room.as_ref())
    }

    pub fn set_current_room(&mut self, name: &UserName, room: Option<RoomName>) {
        if let Some(user) = self.users.get_mut(name) {
            user.current_room = room;
        }
    }

    /// Snapshot of active user names, sorted
    pub fn list_active(&self) -> Vec<UserName> {
        let mut names: Vec<UserName> = self
            .users
            .values()
            .filter(|user| user.active)
            .map(|user| user.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Connections of every active user
    pub fn active_connections(&self) -> Vec<ConnectionId> {
        let mut connections: Vec<ConnectionId> = self.bindings.keys().copied().collect();
        connections.sort();
        connections
    }
}
