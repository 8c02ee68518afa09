//! UseCase: 履歴の取得

use std::sync::Arc;

use crate::domain::{ChatMessage, ChatRoomRepository};

/// 履歴取得のユースケース
pub struct GetHistoryUseCase {
    repository: Arc<dyn ChatRoomRepository>,
}

impl GetHistoryUseCase {
    pub fn new(repository: Arc<dyn ChatRoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在の履歴（古い順）
    pub async fn execute(&self) -> Vec<ChatMessage> {
        self.repository.acquire().await.history_snapshot()
    }
}
