//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("User name cannot be empty")]
    UserNameEmpty,

    #[error("User name must be at least {min} characters (got {actual})")]
    UserNameTooShort { min: usize, actual: usize },

    #[error("User name must be at most {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    #[error("Room name cannot be empty")]
    RoomNameEmpty,

    #[error("Room name must be at most {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    #[error("Message content cannot be empty")]
    MessageContentEmpty,

    #[error("Message content must be at most {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },

    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Malformed message: {0}")]
    Malformed(String),
}

/// Errors raised by the session, room and routing core.
///
/// All of them are reported to the originating connection only and leave the
/// shared state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Username {0} is already taken!")]
    NameTaken(String),

    #[error("This connection is already registered as {0}!")]
    AlreadyRegistered(String),

    #[error("You must be registered first!")]
    Unregistered,

    #[error("User {0} not found!")]
    UnknownUser(String),

    #[error("User {0} is currently offline!")]
    UserOffline(String),

    #[error("Room {0} does not exist!")]
    NoSuchRoom(String),

    #[error("Room {0} already exists!")]
    RoomExists(String),

    #[error("You are not a member of room {0}!")]
    NotMember(String),
}

impl ChatError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::NameTaken(_) => "name_taken",
            ChatError::AlreadyRegistered(_) => "already_registered",
            ChatError::Unregistered => "unregistered",
            ChatError::UnknownUser(_) => "unknown_user",
            ChatError::UserOffline(_) => "user_offline",
            ChatError::NoSuchRoom(_) => "no_such_room",
            ChatError::RoomExists(_) => "room_exists",
            ChatError::NotMember(_) => "not_member",
        }
    }
}

impl ValueObjectError {
    pub fn code(&self) -> &'static str {
        "invalid_input"
    }
}

/// Errors raised while pushing events to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to serialize event: {0}")]
    Serialization(String),
}
