//! Entity 定義

use super::value_object::{ConnectionId, DisplayName, MessageId, MessageText, Timestamp};

/// システムメッセージの送信者名
pub const SYSTEM_SENDER_NAME: &str = "system";

/// 接続に紐づくユーザーの Identity
///
/// join 成功時に作成され、その接続の切断時に破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Identity {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}

/// メッセージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Broadcast,
    Private,
    System,
}

/// チャットメッセージ
///
/// 作成後は不変。個別には削除されず、履歴の保持上限によってのみ追い出される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub kind: MessageKind,
    pub text: String,
    /// system メッセージでは None
    pub sender_connection_id: Option<ConnectionId>,
    pub sender_display_name: String,
    /// private メッセージでのみ Some
    pub recipient_connection_id: Option<ConnectionId>,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 全員宛てのメッセージ
    pub fn broadcast(id: MessageId, sender: &Identity, text: MessageText, timestamp: Timestamp) -> Self {
        Self {
            id,
            kind: MessageKind::Broadcast,
            text: text.into_string(),
            sender_connection_id: Some(sender.connection_id.clone()),
            sender_display_name: sender.display_name.as_str().to_string(),
            recipient_connection_id: None,
            timestamp,
        }
    }

    /// 宛先付きのプライベートメッセージ
    pub fn private(
        id: MessageId,
        sender: &Identity,
        recipient: ConnectionId,
        text: MessageText,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            kind: MessageKind::Private,
            text: text.into_string(),
            sender_connection_id: Some(sender.connection_id.clone()),
            sender_display_name: sender.display_name.as_str().to_string(),
            recipient_connection_id: Some(recipient),
            timestamp,
        }
    }

    /// join / leave などの通知
    pub fn system(id: MessageId, text: String, timestamp: Timestamp) -> Self {
        Self {
            id,
            kind: MessageKind::System,
            text,
            sender_connection_id: None,
            sender_display_name: SYSTEM_SENDER_NAME.to_string(),
            recipient_connection_id: None,
            timestamp,
        }
    }
}
