//! UseCase: join 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 参加者一覧・参加通知の全員への配信と、履歴の本人への配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 join、既存の参加者がいる状態での join
//! - 異常系：空白のみの表示名（何も配信しない）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatRoomError, ChatRoomRepository, ConnectionId, Identity, MessagePusher, Timestamp,
};

use super::fan_out::fan_out;

/// join のユースケース
pub struct JoinChatUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
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

    /// join を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - 登録された Identity
    /// * `Err(ChatRoomError::InvalidName)` - 表示名が不正（何も配信しない）
    /// * `Err(ChatRoomError::ConnectionClosed)` - 切断済みの接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        display_name: &str,
    ) -> Result<Identity, ChatRoomError> {
        let mut room = self.repository.acquire().await;

        let now = Timestamp::new(self.clock.now_millis());
        let outcome = room.join(connection_id, display_name, now)?;

        fan_out(self.message_pusher.as_ref(), outcome.dispatches).await;
        Ok(outcome.value)
    }
}
