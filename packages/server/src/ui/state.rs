//! Shared application state.

use std::sync::Arc;

use crate::usecase::BroadcastCoordinator;

/// Shared application state
pub struct AppState {
    /// 受信イベントの振り分けと読み取りの入口
    pub coordinator: Arc<BroadcastCoordinator>,
}
