//! Domain layer for the chat relay.
//!
//! Leaf-first: value objects, entities, the three stores (Connection Registry,
//! Room Directory, History Store), the typing tracker, and the `ChatState`
//! aggregate that composes them. Traits at the bottom are implemented by the
//! infrastructure layer.

pub mod chat_state;
pub mod conversation;
pub mod directory;
pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod intent;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod typing;
pub mod value_object;

pub use chat_state::{
    ChatState, Deactivation, Delivery, RoomCreation, RoomDeparture, RoomJoin, TypingSignal,
};
pub use conversation::ConversationKey;
pub use directory::{RESERVED_ROOM, RoomDirectory};
pub use entity::{ChatMessage, Room, RoomSummary, User};
pub use error::{ChatError, MessagePushError, ValueObjectError};
pub use event::{ChatEvent, ChatType, DepartureReason, NotificationKind};
pub use history::{HISTORY_CAPACITY, HistoryStore};
pub use intent::Intent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::ChatRepository;
pub use typing::{TYPING_DISPLAY_TIMEOUT, TypingScope, TypingTracker};
pub use value_object::{ConnectionId, MessageContent, RoomName, Timestamp, UserName};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
