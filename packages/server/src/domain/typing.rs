//! Typing Tracker

use super::{
    registry::ConnectionRegistry,
    value_object::{ConnectionId, DisplayName},
};

/// 入力中の接続と表示名の対応
///
/// Registry に存在しない接続のエントリは持たない。
#[derive(Debug, Clone, Default)]
pub struct TypingTracker {
    typing: Vec<(ConnectionId, DisplayName)>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入力状態を更新する
    ///
    /// 接続が Registry にいなければ何もしない。反映した場合に `true` を返す。
    pub fn set_typing(
        &mut self,
        registry: &ConnectionRegistry,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> bool {
        let Ok(identity) = registry.lookup(connection_id) else {
            return false;
        };

        if !is_typing {
            self.clear(connection_id);
            return true;
        }

        let display_name = identity.display_name.clone();
        match self.typing.iter_mut().find(|(id, _)| id == connection_id) {
            Some(entry) => entry.1 = display_name,
            None => self.typing.push((connection_id.clone(), display_name)),
        }
        true
    }

    /// 無条件に削除する。削除した場合に `true` を返す。
    pub fn clear(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.typing.len();
        self.typing.retain(|(id, _)| id != connection_id);
        self.typing.len() != before
    }

    pub fn list_typing_names(&self) -> Vec<DisplayName> {
        self.typing.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.typing.iter().any(|(id, _)| id == connection_id)
    }

    pub fn connection_ids(&self) -> impl Iterator<Item = &ConnectionId> {
        self.typing.iter().map(|(id, _)| id)
    }

    pub fn is_empty(&self) -> bool {
        self.typing.is_empty()
    }
}
