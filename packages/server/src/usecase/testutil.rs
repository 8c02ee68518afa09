//! UseCase テスト用のフィクスチャ

use std::{collections::HashMap, sync::Arc};

use hiroba_shared::time::FixedClock;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ChatRoom, ChatRoomConfig, ConnectionId},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryChatRoomRepository,
    },
};

use super::ConnectClientUseCase;

pub(crate) const NOW: i64 = 1_700_000_000_000;

pub(crate) struct Fixture {
    pub room: Arc<Mutex<ChatRoom>>,
    pub repository: Arc<InMemoryChatRoomRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ChatRoomConfig::default())
    }

    pub fn with_config(config: ChatRoomConfig) -> Self {
        let room = Arc::new(Mutex::new(ChatRoom::new(config)));
        Self {
            repository: Arc::new(InMemoryChatRoomRepository::new(room.clone())),
            room,
            message_pusher: Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
            clock: Arc::new(FixedClock::new(NOW)),
        }
    }

    /// 接続を開き、`connected` フレームを読み捨てた受信側を返す
    pub async fn open(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        ConnectClientUseCase::new(self.repository.clone(), self.message_pusher.clone())
            .execute(connection_id.clone(), tx)
            .await;
        let connected = drain(&mut rx);
        assert_eq!(frame_types(&connected), vec!["connected"]);
        (connection_id, rx)
    }
}

/// 受信済みのフレームをすべて取り出す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

pub(crate) fn frame_types(frames: &[Value]) -> Vec<String> {
    frames
        .iter()
        .map(|frame| frame["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
