//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::MessageKindInfo;

/// `GET /api/messages` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: u64,
    pub kind: MessageKindInfo,
    pub text: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// RFC 3339
    pub timestamp: String,
}

/// `GET /api/users` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub connection_id: String,
    pub display_name: String,
    /// RFC 3339
    pub joined_at: String,
}
