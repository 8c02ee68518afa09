//! UseCase: 入力中状態の更新

use std::sync::Arc;

use crate::domain::{ChatRoomError, ChatRoomRepository, ConnectionId, MessagePusher};

use super::fan_out::fan_out;

/// 入力中状態更新のユースケース
pub struct SetTypingUseCase {
    repository: Arc<dyn ChatRoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SetTypingUseCase {
    pub fn new(
        repository: Arc<dyn ChatRoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 入力中状態を更新し、入力中リストを配信する
    ///
    /// join していない接続からの通知は `ChatRoomError::NotFound` で、何も配信しない。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> Result<(), ChatRoomError> {
        let mut room = self.repository.acquire().await;

        let outcome = room.set_typing(connection_id, is_typing)?;

        fan_out(self.message_pusher.as_ref(), outcome.dispatches).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatRoomConfig, TypingBroadcastPolicy},
        usecase::{
            JoinChatUseCase,
            testutil::{Fixture, drain},
        },
    };

    fn usecase(fixture: &Fixture) -> SetTypingUseCase {
        SetTypingUseCase::new(fixture.repository.clone(), fixture.message_pusher.clone())
    }

    async fn join(fixture: &Fixture, connection_id: &ConnectionId, name: &str) {
        JoinChatUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        )
        .execute(connection_id, name)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_typing_list_is_broadcast_to_everyone() {
        // テスト項目: 入力中リストが送信者を含む全員に届く（既定のポリシー）
        // given (前提条件):
        let fixture = Fixture::new();
        let (alice, mut alice_rx) = fixture.open("alice").await;
        let (bob, mut bob_rx) = fixture.open("bob").await;
        join(&fixture, &alice, "Alice").await;
        join(&fixture, &bob, "Bob").await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        usecase(&fixture).execute(&alice, true).await.unwrap();

        // then (期待する結果):
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "typing_list");
            assert_eq!(frames[0]["display_names"], serde_json::json!(["Alice"]));
        }
    }

    #[tokio::test]
    async fn test_typing_list_excludes_sender_with_others_policy() {
        // テスト項目: 送信者除外ポリシーでは送信者に入力中リストが届かない
        // given (前提条件):
        let fixture = Fixture::with_config(ChatRoomConfig {
            typing_policy: TypingBroadcastPolicy::EveryoneExceptSender,
            ..ChatRoomConfig::default()
        });
        let (alice, mut alice_rx) = fixture.open("alice").await;
        let (bob, mut bob_rx) = fixture.open("bob").await;
        join(&fixture, &alice, "Alice").await;
        join(&fixture, &bob, "Bob").await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        usecase(&fixture).execute(&alice, true).await.unwrap();

        // then (期待する結果):
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(drain(&mut bob_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_typing_from_unjoined_connection_is_ignored() {
        // テスト項目: join していない接続の typing{true} は無視され、配信もない
        // given (前提条件):
        let fixture = Fixture::new();
        let (x, mut x_rx) = fixture.open("x").await;
        let (alice, mut alice_rx) = fixture.open("alice").await;
        join(&fixture, &alice, "Alice").await;
        drain(&mut alice_rx);
        drain(&mut x_rx);

        // when (操作):
        let result = usecase(&fixture).execute(&x, true).await;

        // then (期待する結果):
        assert_eq!(result, Err(ChatRoomError::NotFound(x.clone())));
        assert!(drain(&mut alice_rx).is_empty());
        assert!(drain(&mut x_rx).is_empty());
        assert!(fixture.room.lock().await.typing_names().is_empty());
    }
}
