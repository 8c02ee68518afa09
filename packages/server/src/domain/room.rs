//! ChatRoom 集約
//!
//! Connection Registry / Typing Tracker / Message History を一つにまとめ、
//! 各イベントによる状態遷移と、その結果として誰に何を配信するかを決める。
//!
//! 配信そのものは行わない。戻り値の `Dispatch` を UseCase 層が MessagePusher に渡す。
//! 排他制御は呼び出し側（Repository）が集約全体に対して一つのロックで行う。

use std::collections::HashSet;

use super::{
    entity::{ChatMessage, Identity},
    error::ChatRoomError,
    event::{Dispatch, Recipients, ServerEvent, TypingBroadcastPolicy},
    history::{DEFAULT_HISTORY_CAPACITY, MessageHistory},
    registry::ConnectionRegistry,
    typing::TypingTracker,
    value_object::{ConnectionId, DisplayName, MessageId, MessageText, Timestamp},
};

/// ChatRoom の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatRoomConfig {
    pub history_capacity: usize,
    pub typing_policy: TypingBroadcastPolicy,
}

impl Default for ChatRoomConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            typing_policy: TypingBroadcastPolicy::default(),
        }
    }
}

/// イベント処理の結果と、それに伴う配信計画
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub dispatches: Vec<Dispatch>,
}

impl<T> Outcome<T> {
    fn new(value: T, dispatches: Vec<Dispatch>) -> Self {
        Self { value, dispatches }
    }
}

/// プライベートメッセージの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDelivery {
    pub message: ChatMessage,
    /// 宛先が接続中で配信対象に含まれたか
    pub recipient_available: bool,
}

/// チャットルーム
#[derive(Debug, Clone)]
pub struct ChatRoom {
    /// トランスポート層で生存中の接続（join 前を含む）
    connections: HashSet<ConnectionId>,
    registry: ConnectionRegistry,
    typing: TypingTracker,
    history: MessageHistory,
    typing_policy: TypingBroadcastPolicy,
    last_message_id: u64,
}

impl ChatRoom {
    pub fn new(config: ChatRoomConfig) -> Self {
        Self {
            connections: HashSet::new(),
            registry: ConnectionRegistry::new(),
            typing: TypingTracker::new(),
            history: MessageHistory::new(config.history_capacity),
            typing_policy: config.typing_policy,
            last_message_id: 0,
        }
    }

    /// 新しい接続を受け付ける（join 前の状態）
    ///
    /// 接続には自身の ID を通知する。
    pub fn connect(&mut self, connection_id: ConnectionId) -> Vec<Dispatch> {
        if !self.connections.insert(connection_id.clone()) {
            return Vec::new();
        }
        vec![Dispatch::to(
            connection_id.clone(),
            ServerEvent::Connected(connection_id),
        )]
    }

    /// join: Identity を登録し、参加者一覧・参加通知・履歴を配信する
    ///
    /// # Errors
    ///
    /// - 切断済みの接続なら `ConnectionClosed`
    /// - 表示名が不正なら `InvalidName`
    pub fn join(
        &mut self,
        connection_id: &ConnectionId,
        display_name: &str,
        now: Timestamp,
    ) -> Result<Outcome<Identity>, ChatRoomError> {
        if !self.connections.contains(connection_id) {
            return Err(ChatRoomError::ConnectionClosed(connection_id.clone()));
        }

        let identity = self.registry.join(connection_id.clone(), display_name, now)?;
        if self.typing.contains(connection_id) {
            // 入力中エントリの表示名を更新
            self.typing.set_typing(&self.registry, connection_id, true);
        }

        let notice = self.record_system_notice(
            format!("{} joined the chat", identity.display_name),
            now,
        );

        let dispatches = vec![
            Dispatch::everyone(ServerEvent::PresenceList(self.registry.list())),
            Dispatch::everyone(ServerEvent::SystemNotice(notice)),
            Dispatch::to(
                connection_id.clone(),
                ServerEvent::HistorySnapshot(self.history.snapshot()),
            ),
        ];

        Ok(Outcome::new(identity, dispatches))
    }

    /// send: 全員宛てメッセージを履歴に追加して配信し、送信者の入力中状態を解除する
    ///
    /// # Errors
    ///
    /// - join していなければ `NotFound`
    /// - 本文が不正なら `InvalidMessage`
    pub fn send(
        &mut self,
        connection_id: &ConnectionId,
        text: String,
        now: Timestamp,
    ) -> Result<Outcome<ChatMessage>, ChatRoomError> {
        let sender = self.registry.lookup(connection_id)?.clone();
        let text = MessageText::new(text).map_err(ChatRoomError::InvalidMessage)?;

        let message = ChatMessage::broadcast(self.next_message_id(), &sender, text, now);
        self.history.append(message.clone());
        self.typing.clear(connection_id);

        let dispatches = vec![
            Dispatch::everyone(ServerEvent::Message(message.clone())),
            self.typing_list_dispatch(connection_id),
        ];

        Ok(Outcome::new(message, dispatches))
    }

    /// typing: 入力中状態を更新して入力中リストを配信する
    ///
    /// # Errors
    ///
    /// join していなければ `NotFound`（状態変更も配信もしない）
    pub fn set_typing(
        &mut self,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> Result<Outcome<()>, ChatRoomError> {
        if !self
            .typing
            .set_typing(&self.registry, connection_id, is_typing)
        {
            return Err(ChatRoomError::NotFound(connection_id.clone()));
        }
        Ok(Outcome::new((), vec![self.typing_list_dispatch(connection_id)]))
    }

    /// private message: 宛先（接続中の場合のみ）と送信者にだけ配信する。履歴には残さない。
    ///
    /// # Errors
    ///
    /// - 送信者が join していなければ `NotFound`
    /// - 本文が不正なら `InvalidMessage`
    pub fn private_message(
        &mut self,
        connection_id: &ConnectionId,
        recipient: ConnectionId,
        text: String,
        now: Timestamp,
    ) -> Result<Outcome<PrivateDelivery>, ChatRoomError> {
        let sender = self.registry.lookup(connection_id)?.clone();
        let text = MessageText::new(text).map_err(ChatRoomError::InvalidMessage)?;

        let recipient_available = self.registry.contains(&recipient);
        let message =
            ChatMessage::private(self.next_message_id(), &sender, recipient.clone(), text, now);

        let mut targets = Vec::with_capacity(2);
        if recipient_available && &recipient != connection_id {
            targets.push(recipient);
        }
        targets.push(connection_id.clone());

        let dispatches = vec![Dispatch::new(
            Recipients::Only(targets),
            ServerEvent::PrivateMessage(message.clone()),
        )];

        Ok(Outcome::new(
            PrivateDelivery {
                message,
                recipient_available,
            },
            dispatches,
        ))
    }

    /// disconnect: 接続の痕跡を Registry と Typing Tracker から消す
    ///
    /// join していた場合のみ、退出通知・入力中リスト・参加者一覧を残りの接続に配信する。
    /// 二度目以降の呼び出しは何もしない。
    ///
    /// # Errors
    ///
    /// join していなければ `NotFound`（配信なし）
    pub fn disconnect(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<Outcome<Identity>, ChatRoomError> {
        self.connections.remove(connection_id);
        let left = self.registry.leave(connection_id);
        self.typing.clear(connection_id);
        let identity = left?;

        let notice =
            self.record_system_notice(format!("{} left the chat", identity.display_name), now);
        let remaining = Recipients::EveryoneExcept(connection_id.clone());

        let dispatches = vec![
            Dispatch::new(remaining.clone(), ServerEvent::SystemNotice(notice)),
            Dispatch::new(
                remaining.clone(),
                ServerEvent::TypingList(self.typing.list_typing_names()),
            ),
            Dispatch::new(remaining, ServerEvent::PresenceList(self.registry.list())),
        ];

        Ok(Outcome::new(identity, dispatches))
    }

    pub fn history_snapshot(&self) -> Vec<ChatMessage> {
        self.history.snapshot()
    }

    pub fn presence_list(&self) -> Vec<Identity> {
        self.registry.list()
    }

    pub fn typing_names(&self) -> Vec<DisplayName> {
        self.typing.list_typing_names()
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains(connection_id)
    }

    pub fn is_joined(&self, connection_id: &ConnectionId) -> bool {
        self.registry.contains(connection_id)
    }

    pub fn is_typing(&self, connection_id: &ConnectionId) -> bool {
        self.typing.contains(connection_id)
    }

    /// Typing Tracker のエントリがすべて Registry にも存在するか
    pub fn typing_is_consistent(&self) -> bool {
        self.typing
            .connection_ids()
            .all(|id| self.registry.contains(id))
    }

    fn next_message_id(&mut self) -> MessageId {
        self.last_message_id += 1;
        MessageId::new(self.last_message_id)
    }

    fn record_system_notice(&mut self, text: String, now: Timestamp) -> ChatMessage {
        let notice = ChatMessage::system(self.next_message_id(), text, now);
        self.history.append(notice.clone());
        notice
    }

    fn typing_list_dispatch(&self, sender: &ConnectionId) -> Dispatch {
        Dispatch::new(
            self.typing_policy.recipients(sender),
            ServerEvent::TypingList(self.typing.list_typing_names()),
        )
    }
}

impl Default for ChatRoom {
    fn default() -> Self {
        Self::new(ChatRoomConfig::default())
    }
}
