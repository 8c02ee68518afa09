//! UseCase: プライベートメッセージ送信
//!
//! 宛先と送信者の高々二接続にだけ届け、履歴には残さない。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatRoomError, ChatRoomRepository, ConnectionId, MessagePusher, PrivateDelivery, Timestamp,
};

use super::fan_out::fan_out;

/// プライベートメッセージ送信のユースケース
pub struct SendPrivateMessageUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendPrivateMessageUseCase {
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

    /// プライベートメッセージを送信する
    ///
    /// 宛先が接続していなくてもエラーにはせず、送信者への echo だけを行う。
    ///
    /// # Returns
    ///
    /// * `Ok(PrivateDelivery)` - 作成したメッセージと宛先に届いたかどうか
    /// * `Err(ChatRoomError::InvalidRecipient)` - 宛先 ID が空
    /// * `Err(ChatRoomError::NotFound)` - 送信者が join していない
    /// * `Err(ChatRoomError::InvalidMessage)` - 本文が不正
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        recipient: String,
        text: String,
    ) -> Result<PrivateDelivery, ChatRoomError> {
        let recipient = ConnectionId::new(recipient).map_err(ChatRoomError::InvalidRecipient)?;

        let mut room = self.repository.acquire().await;

        let now = Timestamp::new(self.clock.now_millis());
        let outcome = room.private_message(connection_id, recipient.clone(), text, now)?;
        if !outcome.value.recipient_available {
            tracing::debug!("{}", ChatRoomError::RecipientUnavailable(recipient));
        }

        fan_out(self.message_pusher.as_ref(), outcome.dispatches).await;
        Ok(outcome.value)
    }
}
