//! UseCase: 接続受付
//!
//! トランスポート層で確立した接続を join 前の状態として登録し、
//! 送信チャンネルを MessagePusher に渡す。

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, ConnectionId, MessagePusher, PusherChannel};

use super::fan_out::fan_out;

/// 接続受付のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn ChatRoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続を登録し、本人に接続 ID を通知する
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut room = self.repository.acquire().await;

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        let dispatches = room.connect(connection_id);

        fan_out(self.message_pusher.as_ref(), dispatches).await;
    }
}
