//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join { display_name: String },
    Send { text: String },
    Typing { is_typing: bool },
    PrivateMessage { to: String, text: String },
}

/// Frames sent by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected {
        connection_id: String,
    },
    PresenceList {
        users: Vec<IdentityInfo>,
    },
    SystemNotice {
        id: u64,
        text: String,
        timestamp: i64,
    },
    Message(ChatMessageInfo),
    HistorySnapshot {
        messages: Vec<ChatMessageInfo>,
    },
    TypingList {
        display_names: Vec<String>,
    },
    PrivateMessage(ChatMessageInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub connection_id: String,
    pub display_name: String,
    pub joined_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKindInfo {
    Broadcast,
    Private,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageInfo {
    pub id: u64,
    pub kind: MessageKindInfo,
    pub text: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub timestamp: i64,
}
