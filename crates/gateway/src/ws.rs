use std::{net::SocketAddr, sync::Arc};

use {
    axum::extract::ws::{Message, WebSocket},
    futures::{SinkExt, stream::StreamExt},
    tokio::sync::mpsc,
    tracing::{debug, info, warn},
};

use {
    orion_bridge::MethodRegistry,
    orion_protocol::{MAX_PAYLOAD_BYTES, MethodCall, ResponseFrame, SYSTEM_CHANNEL, error_codes},
};

use crate::state::GatewayState;

/// Handle a single bridge-channel connection: register → call loop → cleanup.
///
/// Every inbound frame is an independent method call; a malformed or
/// oversized frame produces an error event on this connection and never
/// tears it down.
pub async fn handle_connection(
    socket: WebSocket,
    state: Arc<GatewayState>,
    methods: Arc<MethodRegistry>,
    remote_addr: SocketAddr,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    info!(
        conn_id = %conn_id,
        remote_ip = %remote_addr.ip(),
        channel = SYSTEM_CHANNEL,
        "ws: new connection"
    );

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<String>();

    // Write loop: forwards frames from the client_tx channel to the socket.
    let write_conn_id = conn_id.clone();
    let write_handle = tokio::spawn(async move {
        while let Some(msg) = client_rx.recv().await {
            if ws_tx.send(Message::Text(msg.into())).await.is_err() {
                debug!(conn_id = %write_conn_id, "ws: write loop closed");
                break;
            }
        }
    });

    state
        .register_client(conn_id.clone(), client_tx.clone())
        .await;

    // ── Call loop ────────────────────────────────────────────────────────

    while let Some(msg) = ws_rx.next().await {
        let text = match msg {
            Ok(Message::Text(t)) => t.to_string(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "ws: read error");
                break;
            },
        };

        if text.len() > MAX_PAYLOAD_BYTES {
            warn!(conn_id = %conn_id, size = text.len(), "ws: payload too large");
            send_error_event(&state, &client_tx, "payload too large").await;
            continue;
        }

        let call: MethodCall = match serde_json::from_str(&text) {
            Ok(c) => c,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "ws: invalid frame");
                send_error_event(&state, &client_tx, "invalid frame").await;
                continue;
            },
        };

        debug!(conn_id = %conn_id, call_id = %call.id, method = %call.method, "ws: method call");
        let call_id = call.id.clone();
        let outcome = methods.dispatch(call).await;
        let response = ResponseFrame::new(call_id, outcome);
        if let Ok(frame) = serde_json::to_string(&response) {
            let _ = client_tx.send(frame);
        }
    }

    // ── Cleanup ──────────────────────────────────────────────────────────

    state.remove_client(&conn_id).await;
    info!(conn_id = %conn_id, "ws: connection closed");

    // Dropping the last sender ends the write loop once it has drained any
    // queued frames.
    drop(client_tx);
    let _ = write_handle.await;
}

async fn send_error_event(
    state: &GatewayState,
    client_tx: &mpsc::UnboundedSender<String>,
    message: &str,
) {
    let frame = orion_protocol::EventFrame::new(
        "error",
        serde_json::json!({ "code": error_codes::INVALID_REQUEST, "message": message }),
        state.next_seq(),
    );
    if let Ok(text) = serde_json::to_string(&frame) {
        let _ = client_tx.send(text);
    }
}
