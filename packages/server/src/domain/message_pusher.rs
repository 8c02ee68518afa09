//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）の抽象化。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Recipients, ServerEvent};

/// クライアントへの送信チャンネル（シリアライズ済みのテキストを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 送信はチャンネルへの受け渡しのみで、ブロックしない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 宛先に該当する全てのクライアントに送信
    ///
    /// 一部のクライアントへの送信失敗は他のクライアントへの送信に影響しない。
    async fn broadcast(
        &self,
        recipients: &Recipients,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
