//! Broadcast Coordinator
//!
//! トランスポート層からの受信イベントを対応する UseCase に振り分ける唯一の入口。
//! 失敗はいずれもイベント 1 件に閉じたものとして記録し、呼び出し側には返さない。

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ChatRoomError, ChatRoomRepository, ClientEvent, ConnectionId,
    ConnectionIdFactory, Identity, MessagePusher, PusherChannel,
};

use super::{
    ConnectClientUseCase, DisconnectClientUseCase, GetHistoryUseCase, GetPresenceUseCase,
    JoinChatUseCase, SendMessageUseCase, SendPrivateMessageUseCase, SetTypingUseCase,
};

/// 受信イベントの振り分けと読み取り用インターフェース
pub struct BroadcastCoordinator {
    connect_client_usecase: ConnectClientUseCase,
    join_chat_usecase: JoinChatUseCase,
    send_message_usecase: SendMessageUseCase,
    set_typing_usecase: SetTypingUseCase,
    send_private_message_usecase: SendPrivateMessageUseCase,
    disconnect_client_usecase: DisconnectClientUseCase,
    get_history_usecase: GetHistoryUseCase,
    get_presence_usecase: GetPresenceUseCase,
}

impl BroadcastCoordinator {
    pub fn new(
        repository: Arc<dyn ChatRoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_client_usecase: ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            join_chat_usecase: JoinChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            send_message_usecase: SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            set_typing_usecase: SetTypingUseCase::new(repository.clone(), message_pusher.clone()),
            send_private_message_usecase: SendPrivateMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            disconnect_client_usecase: DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher,
                clock,
            ),
            get_history_usecase: GetHistoryUseCase::new(repository.clone()),
            get_presence_usecase: GetPresenceUseCase::new(repository),
        }
    }

    /// 新しい接続を受け付け、割り当てた接続 ID を返す
    pub async fn connect(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionIdFactory::generate();
        self.connect_client_usecase
            .execute(connection_id.clone(), sender)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
        connection_id
    }

    /// 受信イベントを処理する
    pub async fn handle(&self, connection_id: &ConnectionId, event: ClientEvent) {
        let result = match event {
            ClientEvent::Join { display_name } => self
                .join_chat_usecase
                .execute(connection_id, &display_name)
                .await
                .map(|identity| {
                    tracing::info!(
                        "'{}' joined as connection '{}'",
                        identity.display_name,
                        connection_id
                    );
                }),
            ClientEvent::Send { text } => self
                .send_message_usecase
                .execute(connection_id, text)
                .await
                .map(|message| {
                    tracing::debug!("Message {} from '{}'", message.id.value(), connection_id);
                }),
            ClientEvent::Typing { is_typing } => {
                self.set_typing_usecase
                    .execute(connection_id, is_typing)
                    .await
            }
            ClientEvent::PrivateMessage { recipient, text } => self
                .send_private_message_usecase
                .execute(connection_id, recipient, text)
                .await
                .map(|_| ()),
            ClientEvent::Disconnect => self
                .disconnect_client_usecase
                .execute(connection_id)
                .await
                .map(|identity| {
                    tracing::info!(
                        "'{}' left (connection '{}')",
                        identity.display_name,
                        connection_id
                    );
                }),
        };

        if let Err(e) = result {
            log_dropped_event(connection_id, &e);
        }
    }

    pub async fn history_snapshot(&self) -> Vec<ChatMessage> {
        self.get_history_usecase.execute().await
    }

    pub async fn presence_list(&self) -> Vec<Identity> {
        self.get_presence_usecase.execute().await
    }
}

fn log_dropped_event(connection_id: &ConnectionId, error: &ChatRoomError) {
    match error {
        ChatRoomError::NotFound(_)
        | ChatRoomError::RecipientUnavailable(_)
        | ChatRoomError::ConnectionClosed(_) => {
            tracing::debug!("Dropped event from '{}': {}", connection_id, error);
        }
        ChatRoomError::InvalidName(_)
        | ChatRoomError::InvalidMessage(_)
        | ChatRoomError::InvalidRecipient(_) => {
            tracing::warn!("Rejected event from '{}': {}", connection_id, error);
        }
    }
}
