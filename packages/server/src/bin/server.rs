//! Hiroba chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --typing-broadcast others
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::{Parser, ValueEnum};
use hiroba_server::{
    domain::{
        ChatRoom, ChatRoomConfig, DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY,
        TypingBroadcastPolicy,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryChatRoomRepository,
    },
    ui::Server,
    usecase::BroadcastCoordinator,
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

/// Who receives typing lists
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypingBroadcast {
    /// Every connection, including the one whose state changed
    Everyone,
    /// Every connection except the one whose state changed
    Others,
}

impl From<TypingBroadcast> for TypingBroadcastPolicy {
    fn from(value: TypingBroadcast) -> Self {
        match value {
            TypingBroadcast::Everyone => TypingBroadcastPolicy::Everyone,
            TypingBroadcast::Others => TypingBroadcastPolicy::EveryoneExceptSender,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat relay with presence, typing and history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of messages kept in the shared history
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY, value_parser = parse_history_capacity)]
    history_capacity: usize,

    /// Who receives typing lists
    #[arg(long, value_enum, default_value = "everyone")]
    typing_broadcast: TypingBroadcast,
}

/// Accepts 1..=MAX_HISTORY_CAPACITY.
fn parse_history_capacity(value: &str) -> Result<usize, String> {
    let capacity: usize = value
        .parse()
        .map_err(|e| format!("'{}' is not a valid number: {}", value, e))?;
    if !(1..=MAX_HISTORY_CAPACITY).contains(&capacity) {
        return Err(format!(
            "history capacity must be between 1 and {} (got {})",
            MAX_HISTORY_CAPACITY, capacity
        ));
    }
    Ok(capacity)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Repository (in-memory chat room)
    let config = ChatRoomConfig {
        history_capacity: args.history_capacity,
        typing_policy: args.typing_broadcast.into(),
    };
    tracing::info!(
        "Chat room created (history capacity: {}, typing broadcast: {:?})",
        config.history_capacity,
        args.typing_broadcast
    );
    let room = Arc::new(Mutex::new(ChatRoom::new(config)));
    let repository = Arc::new(InMemoryChatRoomRepository::new(room));

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Coordinator
    let coordinator = Arc::new(BroadcastCoordinator::new(
        repository,
        message_pusher,
        Arc::new(SystemClock),
    ));

    // 4. Server
    let server = Server::new(coordinator);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
