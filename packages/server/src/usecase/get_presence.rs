//! UseCase: 参加者一覧の取得

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, Identity};

/// 参加者一覧取得のユースケース
pub struct GetPresenceUseCase {
    repository: Arc<dyn ChatRoomRepository>,
}

impl GetPresenceUseCase {
    pub fn new(repository: Arc<dyn ChatRoomRepository>) -> Self {
        Self { repository }
    }

    /// join 済みの参加者（join 順）
    pub async fn execute(&self) -> Vec<Identity> {
        self.repository.acquire().await.presence_list()
    }
}
