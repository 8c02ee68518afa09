//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 履歴への追加、全員への配信、送信者の入力中状態の解除
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：join 前の送信（黙って破棄）
//! - エッジケース：履歴の上限を超える送信

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ChatRoomError, ChatRoomRepository, ConnectionId, MessagePusher, Timestamp,
};

use super::fan_out::fan_out;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加されたメッセージ
    /// * `Err(ChatRoomError::NotFound)` - join していない
    /// * `Err(ChatRoomError::InvalidMessage)` - 本文が不正
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        text: String,
    ) -> Result<ChatMessage, ChatRoomError> {
        let mut room = self.repository.acquire().await;

        let now = Timestamp::new(self.clock.now_millis());
        let outcome = room.send(connection_id, text, now)?;

        fan_out(self.message_pusher.as_ref(), outcome.dispatches).await;
        Ok(outcome.value)
    }
}
