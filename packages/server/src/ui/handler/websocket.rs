//! WebSocket connection handlers.
//!
//! Each socket is served by one task that reads inbound frames and dispatches
//! them to the use cases one at a time, plus a writer task that drains the
//! connection's outbound buffer into the socket.

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
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, PusherChannel, SignalEvent},
    infrastructure::dto::{
        conversion::encode_event,
        websocket::{DataPayload, InboundMessage, JoinPayload},
    },
    ui::state::AppState,
    usecase::{JoinCommand, RelayCommand},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the socket rejects a write or every sender of the channel is dropped.
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
    let connection_id = ConnectionIdFactory::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if let Err(e) = state
        .connect_peer_usecase
        .execute(connection_id.clone(), tx.clone())
        .await
    {
        tracing::warn!("Rejecting connection: {}", e);
        return;
    }
    tracing::info!("Connection '{}' established", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    // Frames are dispatched inside the select handler, so a join or relay that
    // has started always runs to completion before the socket is torn down.
    loop {
        tokio::select! {
            _ = &mut send_task => {
                tracing::debug!("Writer for '{}' stopped", connection_id);
                break;
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    dispatch(&state, &connection_id, &tx, text.as_str()).await;
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Connection '{}' closed", connection_id);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            },
        }
    }

    send_task.abort();
    state.disconnect_peer_usecase.execute(&connection_id).await;
    tracing::info!("Connection '{}' disconnected", connection_id);
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, tx: &PusherChannel, text: &str) {
    let message = match serde_json::from_str::<InboundMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Malformed message from '{}': {}", connection_id, e);
            reply_malformed(connection_id, tx, &e);
            return;
        }
    };

    match message {
        InboundMessage::Join(payload) => {
            if let Ok(record) = state
                .join_room_usecase
                .execute(connection_id, join_command(payload.unwrap_or_default()))
                .await
            {
                tracing::debug!(
                    "'{}' is now a member of '{}'",
                    connection_id,
                    record.joined.display_name
                );
            }
        }
        InboundMessage::Data(payload) => {
            if let Ok(delivered) = state
                .relay_data_usecase
                .execute(connection_id, relay_command(payload.unwrap_or_default()))
                .await
            {
                tracing::debug!(
                    "Data from '{}' delivered to {} peer(s)",
                    connection_id,
                    delivered.len()
                );
            }
        }
    }
}

/// Malformed frames never reach a use case, so the reply goes straight to the sender's buffer.
fn reply_malformed(connection_id: &ConnectionId, tx: &PusherChannel, error: &serde_json::Error) {
    let event = SignalEvent::error(format!("Malformed message: {error}"));
    match encode_event(&event) {
        Ok(frame) => {
            if tx.send(frame).is_err() {
                tracing::debug!("Outbound buffer of '{}' is closed", connection_id);
            }
        }
        Err(e) => tracing::warn!("Failed to encode error event: {}", e),
    }
}

// DTO から UseCase の入力への変換
fn join_command(payload: JoinPayload) -> JoinCommand {
    JoinCommand {
        username: payload.username,
        room: payload.room,
    }
}

fn relay_command(payload: DataPayload) -> RelayCommand {
    RelayCommand {
        username: payload.username,
        room: payload.room,
        target_peer_id: payload.target_peer_id,
        data: payload.data,
    }
}
