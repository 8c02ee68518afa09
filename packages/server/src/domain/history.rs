//! Message History Buffer

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// 履歴の既定の保持件数
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// 設定で指定できる保持件数の上限
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// 保持件数に上限のあるメッセージ履歴（古い順）
///
/// 上限を超えたら先頭から追い出す（FIFO）。
/// 領域は追加に応じて確保し、上限分を事前には確保しない。
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            capacity,
        }
    }

    /// 末尾に追加する。上限を超えた分は先頭から追い出す。
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// 現在の内容（古い順）
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
