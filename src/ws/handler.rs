//! WebSocket upgrade handler and per-connection session loop

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection through its whole lifecycle:
/// connecting -> active (register + snapshot) -> disconnected (cleanup).
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    info!(conn_id = %conn_id, "new WebSocket connection");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Everything addressed to this connection funnels through one queue;
    // the relay pushes into it from any handler.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMsg>();
    state.game.connect(conn_id, tx);

    // Writer task: relay fan-out -> WebSocket
    let writer_conn_id = conn_id;
    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if let Err(e) = ws_sink.send(Message::Text(json)).await {
                        debug!(conn_id = %writer_conn_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(e) => {
                    error!(conn_id = %writer_conn_id, error = %e, "failed to encode message");
                }
            }
        }
    });

    // Reader loop: WebSocket -> relay. Each message is applied to
    // completion before the next is read; a malformed one is logged and
    // dropped without touching the connection.
    let rate_limiter = ConnectionRateLimiter::new();
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_message() {
                    warn!(conn_id = %conn_id, "rate limited message");
                    continue;
                }
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => state.game.handle(conn_id, msg),
                    Err(e) => {
                        warn!(conn_id = %conn_id, error = %e, "failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(conn_id = %conn_id, "received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(conn_id = %conn_id, "client initiated close");
                break;
            }
            Err(e) => {
                error!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Terminal state: roster cleanup and the disconnect notice
    state.game.disconnect(conn_id);
    writer_handle.abort();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
