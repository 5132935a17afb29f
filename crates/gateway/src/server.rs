use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Json, Router,
        extract::{ConnectInfo, State, WebSocketUpgrade},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::{info, warn},
};

use {
    orion_bridge::{CurrentExeHost, MethodRegistry},
    orion_config::OrionConfig,
    orion_responder::Responder,
    orion_voice::{SynthesisError, SynthesisRequest},
};

use crate::{state::GatewayState, ws::handle_connection};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayState>,
    pub methods: Arc<MethodRegistry>,
}

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: Arc<GatewayState>, methods: Arc<MethodRegistry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/synthesize", post(synthesize_handler))
        .route("/ws", get(ws_upgrade_handler))
        .layer(cors)
        .with_state(AppState {
            gateway: state,
            methods,
        })
}

/// Spawn the background services attached to a gateway state: the responder
/// subscription and the message-created fanout to connected clients.
pub fn spawn_services(state: &Arc<GatewayState>) {
    let responder = match state.config.responder.ack_text.clone() {
        Some(text) => Responder::new(Arc::clone(&state.store)).with_ack_text(text),
        None => Responder::new(Arc::clone(&state.store)),
    };
    tokio::spawn(orion_responder::run(Arc::clone(&state.store), responder));

    let fanout_state = Arc::clone(state);
    tokio::spawn(async move {
        let mut rx = fanout_state.store.subscribe();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let payload = serde_json::json!({
                        "chatId": event.chat_id,
                        "message": event.message,
                    });
                    fanout_state.broadcast("chat.message", payload).await;
                },
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "fanout lagged behind message events");
                },
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Start the gateway HTTP + WebSocket server and block until it exits.
///
/// Takes the already-loaded config so one load governs the whole process.
pub async fn start_gateway(config: OrionConfig, bind: &str, port: u16) -> anyhow::Result<()> {
    let store = Arc::new(orion_chat::ChatStore::new(orion_config::data_dir()));
    let state = Arc::new(GatewayState::new(store, config));
    let methods = Arc::new(MethodRegistry::new(Arc::new(CurrentExeHost)));

    spawn_services(&state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, version = %state.version, "gateway listening");

    serve(listener, state, methods).await
}

/// Serve an already-bound listener. Split out so tests can bind port 0.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<GatewayState>,
    methods: Arc<MethodRegistry>,
) -> anyhow::Result<()> {
    let app = build_app(state, methods);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(app): State<AppState>) -> Json<serde_json::Value> {
    let connections = app.gateway.client_count().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": app.gateway.version,
        "uptimeMs": app.gateway.uptime_ms() as u64,
        "connections": connections,
    }))
}

async fn synthesize_handler(
    State(app): State<AppState>,
    Json(req): Json<SynthesisRequest>,
) -> Response {
    match orion_voice::synthesize(&req, &app.gateway.config.voice) {
        Ok(audio) => (
            [(header::CONTENT_TYPE, audio.mime_type)],
            audio.data,
        )
            .into_response(),
        Err(e @ SynthesisError::EmptyText) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        Err(e @ SynthesisError::BackendUnavailable) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn ws_upgrade_handler(
    State(app): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_connection(socket, app.gateway, app.methods, remote_addr))
}
