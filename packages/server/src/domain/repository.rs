//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::ChatRoom;

/// ChatRoom Repository trait
///
/// 1 イベントの処理（状態変更と配信の引き渡し）は、`acquire` で得た
/// ガードを保持したまま行う。ガードが生きている間、他のイベントは ChatRoom に触れない。
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// ChatRoom への排他アクセスを取得
    async fn acquire(&self) -> OwnedMutexGuard<ChatRoom>;
}
