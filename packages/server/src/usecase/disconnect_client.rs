//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - Registry / Typing Tracker からの削除と、残りの接続への通知
//!
//! ### なぜこのテストが必要か
//! - 切断は接続の状態を片付ける最後の処理であり、二度呼ばれても安全である必要がある
//! - 切断後に join しても接続が復活しないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：join 済み接続の切断と通知
//! - エッジケース：join 前の切断（通知なし）、二重の切断、切断後の join

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatRoomError, ChatRoomRepository, ConnectionId, Identity, MessagePusher, Timestamp,
};

use super::fan_out::fan_out;

/// 切断処理のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
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

    /// 切断を実行
    ///
    /// 送信チャンネルの登録は join の有無に関わらず解除する。
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 退出した参加者
    /// * `Err(ChatRoomError::NotFound)` - join していない、または切断済み（通知なし）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<Identity, ChatRoomError> {
        let mut room = self.repository.acquire().await;

        let now = Timestamp::new(self.clock.now_millis());
        let result = room.disconnect(connection_id, now);
        self.message_pusher.unregister_client(connection_id).await;

        let outcome = result?;
        fan_out(self.message_pusher.as_ref(), outcome.dispatches).await;
        Ok(outcome.value)
    }
}
