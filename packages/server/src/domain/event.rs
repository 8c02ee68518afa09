//! 受信イベントと配信イベント

use super::{
    entity::{ChatMessage, Identity},
    value_object::{ConnectionId, DisplayName},
};

/// 接続から受信するイベント
///
/// いずれも受信した接続に紐づく。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Join { display_name: String },
    Send { text: String },
    Typing { is_typing: bool },
    PrivateMessage { recipient: String, text: String },
    Disconnect,
}

/// トランスポート層に配信を依頼するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 新しい接続に一度だけ送り、自身の接続 ID を知らせる
    Connected(ConnectionId),
    PresenceList(Vec<Identity>),
    SystemNotice(ChatMessage),
    Message(ChatMessage),
    HistorySnapshot(Vec<ChatMessage>),
    TypingList(Vec<DisplayName>),
    PrivateMessage(ChatMessage),
}

/// 配信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// 生存中のすべての接続（join 前を含む）
    Everyone,
    EveryoneExcept(ConnectionId),
    Only(Vec<ConnectionId>),
}

impl Recipients {
    pub fn includes(&self, connection_id: &ConnectionId) -> bool {
        match self {
            Recipients::Everyone => true,
            Recipients::EveryoneExcept(excluded) => excluded != connection_id,
            Recipients::Only(targets) => targets.contains(connection_id),
        }
    }
}

/// 配信イベントとその配信先の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub recipients: Recipients,
    pub event: ServerEvent,
}

impl Dispatch {
    pub fn new(recipients: Recipients, event: ServerEvent) -> Self {
        Self { recipients, event }
    }

    pub fn everyone(event: ServerEvent) -> Self {
        Self::new(Recipients::Everyone, event)
    }

    pub fn to(connection_id: ConnectionId, event: ServerEvent) -> Self {
        Self::new(Recipients::Only(vec![connection_id]), event)
    }
}

/// 入力中リストの配信先ポリシー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypingBroadcastPolicy {
    #[default]
    Everyone,
    EveryoneExceptSender,
}

impl TypingBroadcastPolicy {
    pub fn recipients(&self, sender: &ConnectionId) -> Recipients {
        match self {
            TypingBroadcastPolicy::Everyone => Recipients::Everyone,
            TypingBroadcastPolicy::EveryoneExceptSender => {
                Recipients::EveryoneExcept(sender.clone())
            }
        }
    }
}
