use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use {
    tokio::sync::{RwLock, mpsc},
    tracing::debug,
};

use {orion_chat::ChatStore, orion_config::OrionConfig, orion_protocol::EventFrame};

/// Mutable gateway state shared across connections.
#[derive(Default)]
pub struct Inner {
    /// Connected WS clients: conn id → outbound frame sender.
    pub clients: HashMap<String, mpsc::UnboundedSender<String>>,
}

/// Top-level gateway state. One instance per server.
pub struct GatewayState {
    pub version: String,
    pub started: Instant,
    pub store: Arc<ChatStore>,
    pub config: OrionConfig,
    pub inner: RwLock<Inner>,
    seq: AtomicU64,
}

impl GatewayState {
    pub fn new(store: Arc<ChatStore>, config: OrionConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            started: Instant::now(),
            store,
            config,
            inner: RwLock::new(Inner::default()),
            seq: AtomicU64::new(0),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn uptime_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    pub async fn register_client(&self, conn_id: String, tx: mpsc::UnboundedSender<String>) {
        self.inner.write().await.clients.insert(conn_id, tx);
    }

    pub async fn remove_client(&self, conn_id: &str) {
        self.inner.write().await.clients.remove(conn_id);
    }

    pub async fn client_count(&self) -> usize {
        self.inner.read().await.clients.len()
    }

    /// Push an event frame to every connected client.
    pub async fn broadcast(&self, event: &str, payload: serde_json::Value) {
        let frame = EventFrame::new(event, payload, self.next_seq());
        let Ok(text) = serde_json::to_string(&frame) else {
            return;
        };
        let inner = self.inner.read().await;
        for (conn_id, tx) in &inner.clients {
            if tx.send(text.clone()).is_err() {
                debug!(conn_id = %conn_id, "dropping frame for closed client");
            }
        }
    }
}
