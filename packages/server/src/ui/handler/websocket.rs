//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Intent, ValueObjectError},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::CoordinatorHandle,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.coordinator.clone()))
}

/// Spawns a task that forwards queued events from `rx` to the WebSocket sink.
///
/// The task ends when every sender for `rx` is dropped or the socket fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

/// Parse a text frame into a validated intent
fn parse_intent(text: &str) -> Result<Intent, ValueObjectError> {
    let message = serde_json::from_str::<ClientMessage>(text)
        .map_err(|e| ValueObjectError::Malformed(e.to_string()))?;
    Intent::try_from(message)
}

async fn handle_socket(socket: WebSocket, coordinator: CoordinatorHandle) {
    let connection = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    if coordinator.connect(connection, tx).is_err() {
        tracing::error!("Coordinator is gone, dropping connection '{}'", connection);
        return;
    }
    let mut send_task = pusher_loop(rx, sender);

    let recv_coordinator = coordinator.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection, e);
                    break;
                }
            };

            let submitted = match msg {
                Message::Text(text) => match parse_intent(text.as_str()) {
                    Ok(intent) => recv_coordinator.submit(connection, intent),
                    Err(e) => recv_coordinator.reject(connection, e),
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    Ok(())
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection);
                    break;
                }
                _ => Ok(()),
            };
            if submitted.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => {},
        _ = &mut send_task => recv_task.abort(),
    };

    // The writer ends once the coordinator drops the outbound channel
    if coordinator.disconnect(connection).is_err() {
        tracing::warn!("Coordinator is gone, could not clean up '{}'", connection);
        send_task.abort();
    }
}
