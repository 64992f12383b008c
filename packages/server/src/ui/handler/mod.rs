//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_active_users, get_room_detail, get_rooms, health_check};
pub use websocket::websocket_handler;
