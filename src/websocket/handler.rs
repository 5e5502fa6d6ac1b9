
use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tokio::sync::mpsc;
use tracing::{info, debug, error};
use futures_util::{StreamExt, SinkExt};

use crate::AppState;
use crate::models::{ConnId, ReceivedMessage, SendMessage};
use crate::utils::scope_guard::ScopeGuard;


/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    debug!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {

    // Generate unique connection ID to identify this client
    let conn_id = ConnId::generate();

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Register the outbound queue before any event can address this connection
    let (tx, mut rx) = mpsc::channel::<SendMessage>(app_state.config.outbound_buffer.max(1));
    app_state.relay.connect(conn_id.clone(), tx);

    // Whatever ends this connection, departure is announced exactly once
    let _disconnect = ScopeGuard::new({
        let relay = app_state.relay.clone();
        let conn_id = conn_id.clone();
        move || relay.disconnect(&conn_id)
    });

    // Drain the outbound queue into the socket
    let send_conn_id = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize message for {}: {}", send_conn_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                debug!("Write to {} failed", send_conn_id);
                break;
            }
        }
    });

    // Decode inbound frames and hand them to the relay
    let relay = app_state.relay.clone();
    let recv_conn_id = conn_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ReceivedMessage>(&text) {
                        Ok(event) => {
                            debug!("Received message from {}: {:?}", recv_conn_id, event);
                            relay.dispatch(&recv_conn_id, event);
                        }
                        Err(e) => {
                            debug!("Dropping malformed message from {}: {}", recv_conn_id, e);
                        }
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(Message::Binary(data)) => {
                    debug!("Dropping binary frame of {} bytes from {}", data.len(), recv_conn_id);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Transport error on {}: {}", recv_conn_id, e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    info!("WebSocket connection {} terminated", conn_id);
}
