//! In-memory repository implementations.

mod chat;

pub use chat::InMemoryChatRepository;
