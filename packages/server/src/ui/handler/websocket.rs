//! WebSocket connection handler.
//!
//! Adapts one WebSocket to the coordinator: inbound text frames become
//! `ClientEvent`s, outbound events arrive on the connection's channel.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ClientEvent, ConnectionId},
    infrastructure::dto::conversion::parse_client_frame,
    ui::state::AppState,
    usecase::BroadcastCoordinator,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards frames from the connection's channel to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.coordinator.connect(tx).await;

    let mut send_task = pusher_loop(rx, sender);

    let (closed_tx, closed_rx) = oneshot::channel();
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        closed_rx,
        state.coordinator.clone(),
        connection_id.clone(),
    ));

    // The receive loop is asked to stop, never aborted; it stops between events.
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if recv_finished {
        send_task.abort();
    } else {
        let _ = closed_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::warn!("Receive task for '{}' failed: {}", connection_id, e);
        }
    }

    state
        .coordinator
        .handle(&connection_id, ClientEvent::Disconnect)
        .await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Feeds inbound frames to the coordinator until the peer goes away or `closed` fires.
///
/// `closed` is only observed while waiting for the next frame. An event that has
/// already been read is always handled to the end.
async fn receive_loop<S>(
    mut receiver: S,
    mut closed: oneshot::Receiver<()>,
    coordinator: Arc<BroadcastCoordinator>,
    connection_id: ConnectionId,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let next = tokio::select! {
            next = receiver.next() => next,
            _ = &mut closed => break,
        };
        let Some(Ok(msg)) = next else {
            break;
        };

        match msg {
            Message::Text(text) => match parse_client_frame(text.as_str()) {
                Ok(event) => coordinator.handle(&connection_id, event).await,
                Err(e) => {
                    tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
                }
            },
            Message::Close(_) => {
                tracing::debug!("Connection '{}' requested close", connection_id);
                break;
            }
            // Ping/pong is handled by the WebSocket protocol
            _ => {}
        }
    }
}
