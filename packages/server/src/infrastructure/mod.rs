//! Infrastructure 層: Repository / MessagePusher の実装と DTO

pub mod dto;
pub mod message_pusher;
pub mod repository;
