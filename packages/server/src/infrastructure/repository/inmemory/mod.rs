//! InMemory Repository 実装

pub mod chat_room;

pub use chat_room::InMemoryChatRoomRepository;
