//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

pub use super::websocket::RoomSummaryDto;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub description: String,
    pub members: Vec<String>,
    pub created_by: String,
    /// ISO-8601 (UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUsersDto {
    pub users: Vec<String>,
}
