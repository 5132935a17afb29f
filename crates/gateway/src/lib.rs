//! HTTP + WebSocket gateway hosting the system bridge channel.
//!
//! The gateway is the external host the bridge and responder are registered
//! against: it owns the method registry, the chat store, and the responder
//! service, and pushes message-created events to connected clients.

pub mod server;
pub mod state;
pub mod ws;

pub use {
    server::{AppState, build_app, spawn_services, start_gateway},
    state::GatewayState,
};
