//! Message-created responder: acknowledges every user message.
//!
//! Invoked once per newly created chat message. User messages get a fixed
//! agent reply appended to the same chat; agent messages are ignored, which
//! is what keeps the responder from triggering itself.

pub mod reply;
pub mod service;

pub use {
    reply::{ACK_TEXT, PendingReply, Responder},
    service::run,
};
