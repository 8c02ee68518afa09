//! InMemory ChatRoom Repository 実装
//!
//! ドメイン層が定義する ChatRoomRepository trait の具体的な実装。
//! ChatRoom 全体を一つの `tokio::sync::Mutex` で保護します。
//! Registry / Typing Tracker / History を個別にロックしないため、
//! 各イベントはいずれかの直列順序で処理した結果と一致します。
//!
//! 履歴はメモリ上にのみ存在し、プロセスの再起動で失われます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{ChatRoom, ChatRoomRepository};

/// インメモリ ChatRoom Repository 実装
pub struct InMemoryChatRoomRepository {
    room: Arc<Mutex<ChatRoom>>,
}

impl InMemoryChatRoomRepository {
    /// 新しい InMemoryChatRoomRepository を作成
    pub fn new(room: Arc<Mutex<ChatRoom>>) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryChatRoomRepository {
    async fn acquire(&self) -> OwnedMutexGuard<ChatRoom> {
        self.room.clone().lock_owned().await
    }
}
