//! Connection Registry
//!
//! 接続 ID から Identity への対応を保持する。通知は行わない（Coordinator の責務）。

use super::{
    entity::Identity,
    error::ChatRoomError,
    value_object::{ConnectionId, DisplayName, Timestamp},
};

/// 接続 ID ごとに高々一つの Identity を保持するストア
///
/// 一覧は join した順。
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    identities: Vec<Identity>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity を登録する。既に登録済みなら同じ位置で上書きする。
    ///
    /// # Errors
    ///
    /// 表示名がトリム後に空の場合は `ChatRoomError::InvalidName`
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        display_name: &str,
        joined_at: Timestamp,
    ) -> Result<Identity, ChatRoomError> {
        let display_name = DisplayName::new(display_name).map_err(ChatRoomError::InvalidName)?;
        let identity = Identity::new(connection_id, display_name, joined_at);

        match self.position(&identity.connection_id) {
            Some(index) => self.identities[index] = identity.clone(),
            None => self.identities.push(identity.clone()),
        }

        Ok(identity)
    }

    /// Identity を削除して返す
    ///
    /// # Errors
    ///
    /// join していない接続なら `ChatRoomError::NotFound`
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Result<Identity, ChatRoomError> {
        let index = self
            .position(connection_id)
            .ok_or_else(|| ChatRoomError::NotFound(connection_id.clone()))?;
        Ok(self.identities.remove(index))
    }

    /// 現在の Identity 一覧のスナップショット
    pub fn list(&self) -> Vec<Identity> {
        self.identities.clone()
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Result<&Identity, ChatRoomError> {
        self.identities
            .iter()
            .find(|identity| &identity.connection_id == connection_id)
            .ok_or_else(|| ChatRoomError::NotFound(connection_id.clone()))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.position(connection_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    fn position(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.identities
            .iter()
            .position(|identity| &identity.connection_id == connection_id)
    }
}
