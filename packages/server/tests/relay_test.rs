//! End-to-end tests: an in-process relay driven by real WebSocket and HTTP clients.

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::{ChatRoom, ChatRoomConfig},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryChatRoomRepository,
    },
    ui::Server,
    usecase::BroadcastCoordinator,
};
use hiroba_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::Mutex,
    time::timeout,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

/// Start a relay on an ephemeral port and return its address.
async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let room = Arc::new(Mutex::new(ChatRoom::new(ChatRoomConfig::default())));
    let coordinator = Arc::new(BroadcastCoordinator::new(
        Arc::new(InMemoryChatRoomRepository::new(room)),
        Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        )))),
        Arc::new(SystemClock),
    ));
    tokio::spawn(Server::new(coordinator).serve(listener));

    addr
}

/// Helper struct wrapping one WebSocket client connection
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    connection_id: String,
}

impl TestClient {
    /// Connect and consume the `connected` frame
    async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };
        let connected = client.recv().await;
        assert_eq!(connected["type"], "connected");
        client.connection_id = connected["connection_id"].as_str().unwrap().to_string();
        client
    }

    async fn send_raw(&mut self, frame: &str) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    async fn send(&mut self, value: Value) {
        self.send_raw(&value.to_string()).await;
    }

    async fn join(&mut self, name: &str) {
        self.send(json!({"type": "join", "display_name": name})).await;
        self.recv_until("history_snapshot").await;
    }

    /// Next text frame, parsed as JSON
    async fn recv(&mut self) -> Value {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Skip frames until one of the given type arrives
    async fn recv_until(&mut self, frame_type: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == frame_type {
                return frame;
            }
        }
    }

    /// Assert that no frame arrives for a short while
    async fn assert_silent(&mut self) {
        let result = timeout(SILENCE, self.stream.next()).await;
        assert!(result.is_err(), "unexpected frame: {:?}", result);
    }

    async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}

async fn get_json(addr: SocketAddr, path: &str) -> Value {
    reqwest::get(format!("http://{}{}", addr, path))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let addr = start_server().await;

    // when (操作):
    let body = get_json(addr, "/api/health").await;

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_join_delivers_presence_notice_and_history() {
    // テスト項目: join した本人に参加者一覧・参加通知・履歴がこの順で届く
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;

    // when (操作):
    alice.send(json!({"type": "join", "display_name": "alice"})).await;

    // then (期待する結果):
    let presence = alice.recv().await;
    assert_eq!(presence["type"], "presence_list");
    assert_eq!(presence["users"][0]["display_name"], "alice");
    assert_eq!(presence["users"][0]["connection_id"], alice.connection_id.as_str());

    let notice = alice.recv().await;
    assert_eq!(notice["type"], "system_notice");
    assert_eq!(notice["text"], "alice joined the chat");

    let history = alice.recv().await;
    assert_eq!(history["type"], "history_snapshot");
    assert_eq!(history["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_broadcast_message_reaches_everyone_and_history() {
    // テスト項目: 送信したメッセージが全員に届き、HTTP からも履歴として見える
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    alice.join("alice").await;
    bob.join("bob").await;

    // when (操作):
    alice.send(json!({"type": "send", "text": "hi"})).await;

    // then (期待する結果):
    let to_alice = alice.recv_until("message").await;
    let to_bob = bob.recv_until("message").await;
    assert_eq!(to_alice, to_bob);
    assert_eq!(to_bob["text"], "hi");
    assert_eq!(to_bob["sender"], "alice");

    let messages = get_json(addr, "/api/messages").await;
    let texts: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(
        texts,
        vec!["alice joined the chat", "bob joined the chat", "hi"]
    );

    let users = get_json(addr, "/api/users").await;
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_plain_text_frame_is_sent_as_message() {
    // テスト項目: JSON でないテキストフレームはそのままメッセージとして送信される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    alice.join("alice").await;

    // when (操作):
    alice.send_raw("just text").await;

    // then (期待する結果):
    let message = alice.recv_until("message").await;
    assert_eq!(message["text"], "just text");
}

#[tokio::test]
async fn test_private_message_isolation() {
    // テスト項目: プライベートメッセージは宛先と送信者にだけ届き、履歴に残らない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    let mut carol = TestClient::connect(addr).await;
    alice.join("alice").await;
    bob.join("bob").await;
    carol.join("carol").await;
    // 他の参加者の join による通知を読み捨てる
    alice.recv_until("presence_list").await;
    alice.recv_until("system_notice").await;
    alice.recv_until("presence_list").await;
    alice.recv_until("system_notice").await;
    bob.recv_until("presence_list").await;
    bob.recv_until("system_notice").await;

    // when (操作):
    alice
        .send(json!({"type": "private_message", "to": bob.connection_id, "text": "hey"}))
        .await;

    // then (期待する結果):
    let to_bob = bob.recv().await;
    assert_eq!(to_bob["type"], "private_message");
    assert_eq!(to_bob["text"], "hey");
    assert_eq!(to_bob["sender"], "alice");

    let echo = alice.recv().await;
    assert_eq!(echo, to_bob);

    carol.assert_silent().await;

    let messages = get_json(addr, "/api/messages").await;
    assert!(
        messages
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["text"] != "hey")
    );
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_clients() {
    // テスト項目: 切断すると残りの接続に退出通知・入力中リスト・参加者一覧が届く
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    alice.join("alice").await;
    bob.join("bob").await;
    alice.send(json!({"type": "typing", "is_typing": true})).await;
    let typing = bob.recv_until("typing_list").await;
    assert_eq!(typing["display_names"], json!(["alice"]));

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    let notice = bob.recv_until("system_notice").await;
    assert_eq!(notice["text"], "alice left the chat");
    let typing = bob.recv().await;
    assert_eq!(typing["type"], "typing_list");
    assert_eq!(typing["display_names"], json!([]));
    let presence = bob.recv().await;
    assert_eq!(presence["type"], "presence_list");
    assert_eq!(presence["users"].as_array().unwrap().len(), 1);

    let users = get_json(addr, "/api/users").await;
    assert_eq!(users[0]["display_name"], "bob");
}
