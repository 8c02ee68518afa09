//! UseCase 層: 受信イベントごとのユースケースと、それらをまとめる Coordinator

mod connect_client;
mod coordinator;
mod disconnect_client;
mod fan_out;
mod get_history;
mod get_presence;
mod join_chat;
mod send_message;
mod send_private_message;
mod set_typing;

#[cfg(test)]
mod testutil;

pub use connect_client::ConnectClientUseCase;
pub use coordinator::BroadcastCoordinator;
pub use disconnect_client::DisconnectClientUseCase;
pub use get_history::GetHistoryUseCase;
pub use get_presence::GetPresenceUseCase;
pub use join_chat::JoinChatUseCase;
pub use send_message::SendMessageUseCase;
pub use send_private_message::SendPrivateMessageUseCase;
pub use set_typing::SetTypingUseCase;
