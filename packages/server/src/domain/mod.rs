//! Domain 層: Value Object / Entity / 各ストアと ChatRoom 集約

pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod room;
pub mod typing;
pub mod value_object;

pub use entity::{ChatMessage, Identity, MessageKind, SYSTEM_SENDER_NAME};
pub use error::{ChatRoomError, MessagePushError, ValueObjectError};
pub use event::{ClientEvent, Dispatch, Recipients, ServerEvent, TypingBroadcastPolicy};
pub use history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY, MessageHistory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::ChatRoomRepository;
pub use room::{ChatRoom, ChatRoomConfig, Outcome, PrivateDelivery};
pub use typing::TypingTracker;
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DisplayName, MessageId, MessageText, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
