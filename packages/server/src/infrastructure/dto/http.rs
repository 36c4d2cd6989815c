//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    /// Display names in join order
    pub members: Vec<String>,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<MemberDetailDto>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub sid: String,
    pub username: String,
    /// RFC 3339
    pub joined_at: String,
}
