//! ドメイン層のエラー定義

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value Object の生成エラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("display name must not be empty")]
    DisplayNameEmpty,

    #[error("display name is too long ({actual} > {max} characters)")]
    DisplayNameTooLong { max: usize, actual: usize },

    #[error("message text must not be empty")]
    MessageTextEmpty,

    #[error("message text is too long ({actual} > {max} characters)")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// チャットルームに対するイベント処理のエラー
///
/// いずれも対象イベント 1 件に閉じた失敗であり、ルームの状態はイベント前のまま。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatRoomError {
    /// 表示名が不正（空白のみ、長すぎる）
    #[error("invalid display name: {0}")]
    InvalidName(ValueObjectError),

    /// メッセージ本文が不正
    #[error("invalid message: {0}")]
    InvalidMessage(ValueObjectError),

    /// プライベートメッセージの宛先 ID が不正（空文字列など）
    #[error("invalid recipient: {0}")]
    InvalidRecipient(ValueObjectError),

    /// 接続に Identity がない（join 前など）
    #[error("connection '{0}' has not joined")]
    NotFound(ConnectionId),

    /// プライベートメッセージの宛先が接続していない
    #[error("recipient '{0}' is not connected")]
    RecipientUnavailable(ConnectionId),

    /// 既に切断済みの接続
    #[error("connection '{0}' is closed")]
    ConnectionClosed(ConnectionId),
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to serialize event: {0}")]
    SerializationFailed(String),
}
