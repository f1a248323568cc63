//! Live transfer feed over WebSocket.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use openfeed_core::events::TransferBroadcastReceiver;

use crate::state::AppState;

/// `GET /transfers/ws` — live transfer stream.
///
/// Upgrades the HTTP connection to a WebSocket and pushes one JSON text
/// frame per new transfer, in the order the monitor observed them. There
/// is no replay: a client sees only transfers broadcast while it is
/// connected, and reconnecting starts a fresh subscription.
pub(super) async fn transfer_feed_ws(
    state: State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Subscribe before the upgrade completes so nothing broadcast during
    // the handshake slips past this connection.
    let feed_rx = state.transfer_tx.subscribe();
    ws.on_upgrade(move |socket| handle_feed_ws(socket, feed_rx))
}

/// Background task that drives a single WebSocket connection.
///
/// Forwards each broadcast notification as its own text frame until the
/// client disconnects or the channel closes. A receiver that falls behind
/// the channel buffer skips the overrun and continues with future events.
async fn handle_feed_ws(mut socket: WebSocket, mut feed_rx: TransferBroadcastReceiver) {
    loop {
        tokio::select! {
            // Incoming broadcast notification
            result = feed_rx.recv() => {
                match result {
                    Ok(notification) => {
                        if send_json(&mut socket, &notification).await.is_err() {
                            return; // client gone
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "WS: transfer feed receiver lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        // Monitor gone (server shutting down)
                        break;
                    }
                }
            }

            // Incoming WebSocket frame from the client (ping/pong/close)
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        return;
                    }
                    Some(Ok(_)) => {
                        // Ignore other client messages (text, binary, ping)
                    }
                    Some(Err(_)) => {
                        // WebSocket error — drop the connection
                        return;
                    }
                }
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}
